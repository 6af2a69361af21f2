// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text extraction from stream chunks.
//!
//! Targon has been observed returning text under different keys, so
//! extraction tries an ordered list of strategies and keeps the first
//! non-empty match. Provisional: narrow this list once the chunk schema
//! is confirmed.

use serde_json::Value;

use crate::types::{ChunkUsage, ToolCallDelta};

/// Reads text out of one chunk shape.
pub type ExtractionStrategy = fn(&Value) -> Option<&str>;

/// Strategies in priority order.
pub const TEXT_STRATEGIES: &[ExtractionStrategy] = &[delta_content, message_content, bare_string];

/// `choices[0].delta.content`, the standard streaming shape.
pub fn delta_content(chunk: &Value) -> Option<&str> {
    chunk.pointer("/choices/0/delta/content")?.as_str()
}

/// `choices[0].message.content`, seen when the server sends whole messages.
pub fn message_content(chunk: &Value) -> Option<&str> {
    chunk.pointer("/choices/0/message/content")?.as_str()
}

/// The chunk itself is a string.
pub fn bare_string(chunk: &Value) -> Option<&str> {
    chunk.as_str()
}

/// Returns the first non-empty text found by [`TEXT_STRATEGIES`].
pub fn extract_text(chunk: &Value) -> Option<&str> {
    TEXT_STRATEGIES
        .iter()
        .filter_map(|strategy| strategy(chunk))
        .find(|text| !text.is_empty())
}

/// Tool-call deltas in `choices[0].delta.tool_calls`. Entries that do not
/// decode are dropped.
pub fn extract_tool_calls(chunk: &Value) -> Vec<ToolCallDelta> {
    chunk
        .pointer("/choices/0/delta/tool_calls")
        .and_then(Value::as_array)
        .map(|calls| {
            calls
                .iter()
                .filter_map(|call| serde_json::from_value(call.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Usage counts, when the chunk carries a non-null `usage` object.
pub fn extract_usage(chunk: &Value) -> Option<ChunkUsage> {
    chunk
        .get("usage")
        .filter(|usage| usage.is_object())
        .and_then(|usage| serde_json::from_value(usage.clone()).ok())
}

/// Response id of the chunk.
pub fn extract_id(chunk: &Value) -> Option<&str> {
    chunk.get("id")?.as_str().filter(|id| !id.is_empty())
}
