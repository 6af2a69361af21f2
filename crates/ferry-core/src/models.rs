// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static table of Targon models and their limits.

use serde::Serialize;

/// Metadata for a selectable backend model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    /// Maximum tokens the model may generate. `None` lets the adapter pick its fallback.
    pub max_tokens: Option<u32>,
    pub context_window: u32,
    pub supports_images: bool,
    pub description: &'static str,
}

/// Model used when no id is configured or the configured id is unknown.
pub const TARGON_DEFAULT_MODEL_ID: &str = "deepseek-ai/DeepSeek-V3";

/// All models served by the Targon endpoint.
pub const TARGON_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "deepseek-ai/DeepSeek-V3",
        max_tokens: Some(8192),
        context_window: 64_000,
        supports_images: false,
        description: "DeepSeek V3 general chat model",
    },
    ModelInfo {
        id: "deepseek-ai/DeepSeek-R1",
        max_tokens: Some(8192),
        context_window: 64_000,
        supports_images: false,
        description: "DeepSeek R1 reasoning model",
    },
    ModelInfo {
        id: "deepseek-ai/DeepSeek-R1-Distill-Llama-70B",
        max_tokens: Some(4096),
        context_window: 32_768,
        supports_images: false,
        description: "R1 distilled onto Llama 70B",
    },
    ModelInfo {
        id: "Qwen/Qwen2.5-72B-Instruct",
        max_tokens: Some(8192),
        context_window: 32_768,
        supports_images: false,
        description: "Qwen 2.5 72B instruction-tuned",
    },
    ModelInfo {
        id: "Qwen/Qwen2.5-Coder-32B-Instruct",
        max_tokens: Some(8192),
        context_window: 32_768,
        supports_images: false,
        description: "Qwen 2.5 coder 32B",
    },
    ModelInfo {
        id: "NousResearch/Hermes-3-Llama-3.1-8B",
        max_tokens: None,
        context_window: 32_768,
        supports_images: false,
        description: "Hermes 3 on Llama 3.1 8B",
    },
];

/// Looks up a model by exact id.
pub fn find_model(id: &str) -> Option<&'static ModelInfo> {
    TARGON_MODELS.iter().find(|m| m.id == id)
}

/// Returns the default model entry.
pub fn default_model() -> &'static ModelInfo {
    find_model(TARGON_DEFAULT_MODEL_ID).unwrap_or(&TARGON_MODELS[0])
}

/// Resolves an optional requested id, falling back to the default entry.
pub fn resolve_model(requested: Option<&str>) -> &'static ModelInfo {
    requested.and_then(find_model).unwrap_or_else(default_model)
}
