// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Ferry.
//!
//! This crate provides the adapter traits, error type, static model table,
//! and the message/fragment types exchanged between a host application and
//! a provider adapter.

pub mod error;
pub mod models;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::FerryError;
pub use models::ModelInfo;
pub use traits::{FragmentStream, PluginAdapter, ProviderAdapter};
pub use types::{
    ConversationMessage, HealthStatus, MessageContent, ResponseMetrics, ResponseSummary, Role,
    StreamFragment,
};
