// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Default Targon API base URL (OpenAI-compatible).
pub const DEFAULT_TARGON_BASE_URL: &str = "https://api.targon.com/v1";

/// Top-level Ferry configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FerryConfig {
    /// Targon provider settings.
    #[serde(default)]
    pub targon: TargonConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Targon API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TargonConfig {
    /// Targon API key. `None` falls back to the `TARGON_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Requested model id. Unknown or missing ids resolve to the default model.
    #[serde(default)]
    pub model_id: Option<String>,

    /// Base URL of the chat-completions API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Append a conciseness instruction to system prompts that lack one.
    #[serde(default = "default_concise_prompt")]
    pub concise_prompt: bool,

    /// Overall HTTP request timeout handed to the client. `None` means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for TargonConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_id: None,
            base_url: default_base_url(),
            concise_prompt: default_concise_prompt(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_TARGON_BASE_URL.to_string()
}

fn default_concise_prompt() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
