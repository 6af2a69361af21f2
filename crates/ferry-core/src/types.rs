// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared between provider adapters and their callers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message content -- plain text or an arbitrary structured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text, sent as-is.
    Text(String),
    /// Structured content (content blocks, tool results, ...), sent as its JSON text.
    Structured(serde_json::Value),
}

impl MessageContent {
    /// Returns the text representation sent to the provider.
    pub fn to_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Structured(value) => value.to_string(),
        }
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<serde_json::Value> for MessageContent {
    fn from(value: serde_json::Value) -> Self {
        MessageContent::Structured(value)
    }
}

/// A single message in a conversation, owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// One incremental unit of output delivered to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamFragment {
    Text { text: String },
}

impl StreamFragment {
    pub fn text(text: impl Into<String>) -> Self {
        StreamFragment::Text { text: text.into() }
    }

    /// Returns the text carried by this fragment.
    pub fn as_text(&self) -> &str {
        match self {
            StreamFragment::Text { text } => text,
        }
    }
}

/// Token usage and latency of one provider call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetrics {
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub tokens_total: u64,
    /// Wall-clock time from request start to end of stream, in milliseconds.
    pub elapsed_ms: u64,
}

impl ResponseMetrics {
    pub fn new(tokens_in: u64, tokens_out: u64, elapsed_ms: u64) -> Self {
        Self {
            tokens_in,
            tokens_out,
            tokens_total: tokens_in + tokens_out,
            elapsed_ms,
        }
    }
}

/// Final record of a streamed response, emitted as the last fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    pub id: String,
    pub model: String,
    pub content: String,
    /// Creation time in RFC 3339 format.
    pub created: String,
    pub metrics: ResponseMetrics,
}

impl ResponseSummary {
    /// Serializes the summary into a text fragment.
    pub fn into_fragment(self) -> Result<StreamFragment, serde_json::Error> {
        serde_json::to_string(&self).map(StreamFragment::text)
    }
}
