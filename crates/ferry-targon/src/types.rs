// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat-completions request and stream chunk types.

use serde::{Deserialize, Serialize};

// --- Request types ---

/// A streaming request to the Targon chat-completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier (e.g., "deepseek-ai/DeepSeek-V3").
    pub model: String,

    /// Conversation messages, system prompt first.
    pub messages: Vec<ChatMessage>,

    /// Always true; the adapter only consumes streams.
    pub stream: bool,

    /// Sampling temperature.
    pub temperature: f64,

    /// Maximum tokens to generate.
    pub max_tokens: u32,

    /// Tool definitions the model may call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

/// A single role/content pair on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user" or "assistant".
    pub role: String,
    /// Plain-text content.
    pub content: String,
}

/// A function tool definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Always "function".
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

impl ToolDefinition {
    pub fn function(name: &str, description: &str, parameters: serde_json::Value) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }
}

/// Name, description, and JSON Schema of a callable function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the function's parameters.
    pub parameters: serde_json::Value,
}

// --- Stream chunk types ---

/// Token usage reported in the terminal chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ChunkUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

/// One entry of `choices[0].delta.tool_calls`.
///
/// Only the first delta for a call carries `id` and `function.name`; later
/// deltas carry argument fragments keyed by `index`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub function: Option<FunctionCallDelta>,
}

/// Incremental function name/arguments of a tool call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FunctionCallDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

// --- Error types ---

/// Error body returned by OpenAI-compatible APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Detail of an API error.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    /// Either a string code or the numeric HTTP status, depending on the server.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl ApiErrorDetail {
    /// Returns the code as an HTTP status when it is numeric.
    pub fn status(&self) -> Option<u16> {
        match &self.code {
            Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Some(serde_json::Value::String(s)) => s.parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_absent_tools() {
        let request = ChatCompletionRequest {
            model: "m".into(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: "Hi".into(),
            }],
            stream: true,
            temperature: 0.0,
            max_tokens: 1024,
            tools: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none());
        assert_eq!(json["stream"], true);
        assert_eq!(json["max_tokens"], 1024);
    }

    #[test]
    fn tool_definition_wire_shape() {
        let tool = ToolDefinition::function("t", "does t", serde_json::json!({"type": "object"}));
        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "t");
        assert_eq!(json["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn usage_defaults_missing_counts() {
        let usage: ChunkUsage = serde_json::from_str(r#"{"prompt_tokens": 5}"#).unwrap();
        assert_eq!(usage.prompt_tokens, 5);
        assert_eq!(usage.completion_tokens, 0);
    }

    #[test]
    fn tool_call_delta_partial_fields() {
        let delta: ToolCallDelta =
            serde_json::from_str(r#"{"index": 1, "function": {"arguments": "{\"q"}}"#).unwrap();
        assert_eq!(delta.index, 1);
        assert!(delta.id.is_none());
        let function = delta.function.unwrap();
        assert!(function.name.is_none());
        assert_eq!(function.arguments.as_deref(), Some("{\"q"));
    }

    #[test]
    fn api_error_numeric_and_string_codes() {
        let numeric: ApiErrorResponse =
            serde_json::from_str(r#"{"error": {"message": "down", "code": 503}}"#).unwrap();
        assert_eq!(numeric.error.status(), Some(503));

        let text: ApiErrorResponse = serde_json::from_str(
            r#"{"error": {"message": "bad", "type": "invalid_request_error", "code": "invalid_model"}}"#,
        )
        .unwrap();
        assert_eq!(text.error.status(), None);
        assert_eq!(text.error.type_.as_deref(), Some("invalid_request_error"));
    }
}
