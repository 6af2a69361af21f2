// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-attempt state of a streamed response.

use std::sync::Arc;
use std::time::Duration;

use ferry_core::{ResponseMetrics, ResponseSummary, StreamFragment};
use serde_json::Value;

use crate::extract;
use crate::tools::{ToolCallAccumulator, ToolRegistry};

/// What a consumption pass looks at besides text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeMode {
    /// Text, tool calls, usage, and response id.
    Full,
    /// Text only. Used by the simplified 503 retry.
    ContentOnly,
}

/// Accumulates one attempt's output and turns each chunk into fragments.
#[derive(Debug)]
pub struct ResponseState {
    mode: ConsumeMode,
    request_id: Option<String>,
    text: String,
    tokens_in: u64,
    tokens_out: u64,
    tool_calls: ToolCallAccumulator,
}

impl ResponseState {
    pub fn new(mode: ConsumeMode, tools: Arc<ToolRegistry>) -> Self {
        Self {
            mode,
            request_id: None,
            text: String::new(),
            tokens_in: 0,
            tokens_out: 0,
            tool_calls: ToolCallAccumulator::new(tools),
        }
    }

    /// Processes one chunk and returns the fragments to yield for it, in order.
    pub fn process(&mut self, chunk: &Value) -> Vec<StreamFragment> {
        let mut fragments = Vec::new();

        if let Some(text) = extract::extract_text(chunk) {
            self.text.push_str(text);
            fragments.push(StreamFragment::text(text));
        }

        if self.mode == ConsumeMode::ContentOnly {
            return fragments;
        }

        if self.request_id.is_none() {
            self.request_id = extract::extract_id(chunk).map(str::to_string);
        }

        for delta in extract::extract_tool_calls(chunk) {
            if let Some(block) = self.tool_calls.ingest(&delta) {
                fragments.push(StreamFragment::text(block));
            }
        }

        // Last reported usage wins.
        if let Some(usage) = extract::extract_usage(chunk) {
            self.tokens_in = usage.prompt_tokens;
            self.tokens_out = usage.completion_tokens;
        }

        fragments
    }

    /// Concatenated text streamed so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Builds the summary for this attempt.
    pub fn into_summary(self, model: &str, elapsed: Duration) -> ResponseSummary {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        ResponseSummary {
            id: self
                .request_id
                .unwrap_or_else(|| format!("targon-{}", uuid::Uuid::new_v4())),
            model: model.to_string(),
            content: self.text,
            created: chrono::Utc::now().to_rfc3339(),
            metrics: ResponseMetrics::new(self.tokens_in, self.tokens_out, elapsed_ms),
        }
    }
}
