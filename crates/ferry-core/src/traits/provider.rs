// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for streaming LLM integrations.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::FerryError;
use crate::models::ModelInfo;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ConversationMessage, StreamFragment};

/// Lazy, single-pass sequence of fragments produced by one call.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<StreamFragment, FerryError>> + Send>>;

/// Adapter for LLM provider integrations.
///
/// A call yields text fragments as the provider streams them, followed by
/// exactly one serialized [`ResponseSummary`](crate::types::ResponseSummary)
/// fragment. Errors end the stream; fragments already yielded stay yielded.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Returns the model this adapter sends requests to.
    fn model(&self) -> &'static ModelInfo;

    /// Starts a streaming completion for the given system prompt and messages.
    ///
    /// Precondition failures (such as a missing API key) are returned before
    /// any network activity.
    async fn create_message(
        &self,
        system_prompt: &str,
        messages: &[ConversationMessage],
    ) -> Result<FragmentStream, FerryError>;
}
