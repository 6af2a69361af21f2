// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Targon chat-completions API.
//!
//! [`TargonClient`] performs exactly one HTTP attempt per call. Recovery
//! from transient failures is owned by the provider, not by this client.

use std::time::Duration;

use ferry_core::FerryError;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::sse::{self, EventStream};
use crate::types::{ApiErrorResponse, ChatCompletionRequest};

/// Path of the chat-completions endpoint relative to the base URL.
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// HTTP client for Targon API communication.
#[derive(Debug, Clone)]
pub struct TargonClient {
    client: reqwest::Client,
    endpoint: String,
}

impl TargonClient {
    /// Creates a client for the given base URL.
    ///
    /// `timeout` bounds the whole request, stream included. `None` disables it.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FerryError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| FerryError::Provider {
            message: format!("failed to build HTTP client: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}{CHAT_COMPLETIONS_PATH}",
                base_url.trim_end_matches('/')
            ),
        })
    }

    /// Returns the full chat-completions URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a streaming request and returns the decoded event stream.
    ///
    /// Non-success statuses become [`FerryError::Provider`] with the status
    /// attached and the provider's error message unwrapped when present.
    pub async fn stream_chat(
        &self,
        request: &ChatCompletionRequest,
        api_key: &SecretString,
    ) -> Result<EventStream, FerryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| FerryError::Provider {
                message: format!("HTTP request failed: {e}"),
                status: e.status().map(|s| s.as_u16()),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "streaming response received");

        if status.is_success() {
            return Ok(sse::parse_sse_stream(response));
        }

        let body = response.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => api_err.error.message,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string(),
            Err(_) => body,
        };

        Err(FerryError::provider(
            format!("Targon API returned {status}: {detail}"),
            Some(status.as_u16()),
        ))
    }
}
