// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Ferry provider adapters.

use thiserror::Error;

/// The primary error type used across Ferry adapter traits and core operations.
#[derive(Debug, Error)]
pub enum FerryError {
    /// Configuration errors (missing API key, invalid header values, bad settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// LLM provider errors (HTTP failure, error status, broken stream).
    ///
    /// `status` carries the HTTP status code when the provider returned one.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failure to serialize or deserialize a payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FerryError {
    /// Builds a provider error without an underlying source.
    pub fn provider(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Provider {
            message: message.into(),
            status,
            source: None,
        }
    }

    /// Returns the HTTP status code attached to a provider error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => *status,
            _ => None,
        }
    }
}
