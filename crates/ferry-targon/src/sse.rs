// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for chat-completions streaming responses.
//!
//! Converts a reqwest response byte stream into raw JSON chunks using the
//! `eventsource-stream` crate for SSE protocol compliance. Chunks stay
//! untyped because the provider's chunk shape is not stable; see
//! [`crate::extract`].

use std::pin::Pin;

use eventsource_stream::Eventsource;
use ferry_core::FerryError;
use futures::stream::{Stream, StreamExt};
use serde_json::Value;

use crate::types::ApiErrorResponse;

/// Sentinel data line that ends an OpenAI-compatible stream.
const DONE_SENTINEL: &str = "[DONE]";

/// Stream of decoded provider events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<Value, FerryError>> + Send>>;

/// Parses a streaming response into decoded events.
///
/// Each `data:` payload becomes one [`Value`]. Payloads that are not JSON
/// are passed through as [`Value::String`]. An error object sent inside the
/// stream is surfaced as [`FerryError::Provider`]. The `[DONE]` sentinel
/// ends the stream.
pub fn parse_sse_stream(response: reqwest::Response) -> EventStream {
    let events = response
        .bytes_stream()
        .eventsource()
        .take_while(|result| {
            let done = matches!(result, Ok(event) if event.data.trim() == DONE_SENTINEL);
            async move { !done }
        })
        .filter_map(|result| async move {
            match result {
                Ok(event) => decode_data(&event.data),
                Err(e) => Some(Err(FerryError::provider(format!("SSE stream error: {e}"), None))),
            }
        });

    Box::pin(events)
}

/// Decodes one `data:` payload. Empty payloads are skipped.
fn decode_data(data: &str) -> Option<Result<Value, FerryError>> {
    let data = data.trim();
    if data.is_empty() {
        return None;
    }

    let value = match serde_json::from_str::<Value>(data) {
        Ok(value) => value,
        Err(_) => return Some(Ok(Value::String(data.to_string()))),
    };

    if value.get("error").is_some_and(Value::is_object) {
        let parsed = serde_json::from_value::<ApiErrorResponse>(value.clone());
        let (message, status) = match parsed {
            Ok(body) => {
                let status = body.error.status();
                (body.error.message, status)
            }
            Err(_) => (value["error"].to_string(), None),
        };
        let message = match status {
            Some(code) => format!("stream error ({code}): {message}"),
            None => format!("stream error: {message}"),
        };
        return Some(Err(FerryError::provider(message, status)));
    }

    Some(Ok(value))
}
