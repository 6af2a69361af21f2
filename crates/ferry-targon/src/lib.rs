// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Targon provider adapter for Ferry.
//!
//! This crate implements [`ProviderAdapter`] for Targon's OpenAI-compatible
//! chat-completions API. Responses are always streamed: text fragments are
//! yielded as they arrive, followed by one serialized
//! [`ResponseSummary`](ferry_core::ResponseSummary) fragment.

pub mod client;
pub mod extract;
pub mod hints;
pub mod logging;
pub mod prompt;
pub mod response;
pub mod sse;
pub mod tools;
pub mod types;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_stream::try_stream;
use async_trait::async_trait;
use ferry_config::FerryConfig;
use ferry_core::models::{self, ModelInfo};
use ferry_core::{
    ConversationMessage, FerryError, FragmentStream, HealthStatus, PluginAdapter, ProviderAdapter,
    StreamFragment,
};
use futures::stream::{Stream, StreamExt};
use secrecy::SecretString;
use tracing::{debug, info, warn};

pub use client::TargonClient;
pub use logging::init_tracing;
pub use prompt::make_prompt_concise;
pub use tools::{AskFollowupQuestion, ToolFormatter, ToolRegistry};

use crate::response::{ConsumeMode, ResponseState};
use crate::types::{ChatCompletionRequest, ChatMessage};

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "TARGON_API_KEY";

/// Sampling temperature of regular requests.
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Output budget for models whose table entry has no maximum.
const FALLBACK_MAX_TOKENS: u32 = 4096;

/// Output budget of the simplified request sent after a 503.
const RETRY_MAX_TOKENS: u32 = 1024;

/// Characters of each message shown in request debug logs.
const PREVIEW_CHARS: usize = 50;

/// Targon provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `TARGON_API_KEY` env var -> absent.
/// An absent key is not an error until [`ProviderAdapter::create_message`]
/// is called.
pub struct TargonProvider {
    client: TargonClient,
    api_key: Option<Arc<SecretString>>,
    model: &'static ModelInfo,
    concise_prompt: bool,
    tools: Arc<ToolRegistry>,
}

impl TargonProvider {
    /// Creates a new Targon provider from the given configuration.
    pub fn new(config: &FerryConfig) -> Result<Self, FerryError> {
        Self::with_api_key(config, resolve_api_key(config.targon.api_key.as_deref()))
    }

    /// Creates a provider with an explicit key, bypassing config and environment lookup.
    pub fn with_api_key(
        config: &FerryConfig,
        api_key: Option<SecretString>,
    ) -> Result<Self, FerryError> {
        let timeout = config.targon.request_timeout_secs.map(Duration::from_secs);
        let client = TargonClient::new(&config.targon.base_url, timeout)?;
        let model = models::resolve_model(config.targon.model_id.as_deref());

        info!(
            model = model.id,
            endpoint = client.endpoint(),
            has_api_key = api_key.is_some(),
            "Targon provider initialized"
        );

        Ok(Self {
            client,
            api_key: api_key.map(Arc::new),
            model,
            concise_prompt: config.targon.concise_prompt,
            tools: Arc::new(ToolRegistry::default()),
        })
    }

    /// Registers an additional tool formatter, replacing any with the same name.
    pub fn with_tool_formatter(mut self, formatter: Arc<dyn ToolFormatter>) -> Self {
        Arc::make_mut(&mut self.tools).register(formatter);
        self
    }

    /// Returns the resolved model entry. Unknown ids resolve to the default.
    pub fn get_model(&self) -> &'static ModelInfo {
        self.model
    }

    /// Builds the primary streaming request for a call.
    ///
    /// The system prompt goes first, rewritten for brevity when enabled.
    /// Tool definitions are attached only when an input message mentions a
    /// registered tool's trigger.
    pub fn build_request(
        &self,
        system_prompt: &str,
        messages: &[ConversationMessage],
    ) -> ChatCompletionRequest {
        let conversation: Vec<ChatMessage> = messages
            .iter()
            .map(|m| ChatMessage {
                role: m.role.as_str().to_string(),
                content: m.content.to_text(),
            })
            .collect();
        let tools = self.tools.definitions_for(&conversation);

        let system = if self.concise_prompt {
            make_prompt_concise(system_prompt)
        } else {
            system_prompt.to_string()
        };

        let mut wire_messages = Vec::with_capacity(conversation.len() + 1);
        wire_messages.push(ChatMessage {
            role: "system".to_string(),
            content: system,
        });
        wire_messages.extend(conversation);

        let request = ChatCompletionRequest {
            model: self.model.id.to_string(),
            messages: wire_messages,
            stream: true,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: self.model.max_tokens.unwrap_or(FALLBACK_MAX_TOKENS),
            tools,
        };
        log_request(&request);
        request
    }
}

/// Derives the simplified request sent once after a 503: same messages,
/// no tools, deterministic sampling and a smaller output budget.
fn fallback_request(request: &ChatCompletionRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        tools: None,
        temperature: 0.0,
        max_tokens: RETRY_MAX_TOKENS,
        ..request.clone()
    }
}

fn log_request(request: &ChatCompletionRequest) {
    debug!(
        model = %request.model,
        messages = request.messages.len(),
        tools = request.tools.as_ref().map_or(0, Vec::len),
        temperature = request.temperature,
        max_tokens = request.max_tokens,
        "built Targon request"
    );
    for (index, message) in request.messages.iter().enumerate() {
        let preview: String = message.content.chars().take(PREVIEW_CHARS).collect();
        debug!(index, role = %message.role, preview = %preview, "request message");
    }
}

/// Resolves the API key from config or environment. Empty values count as absent.
fn resolve_api_key(config_key: Option<&str>) -> Option<SecretString> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Some(SecretString::from(key.to_string()));
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}

fn boxed<S>(stream: S) -> FragmentStream
where
    S: Stream<Item = Result<StreamFragment, FerryError>> + Send + 'static,
{
    Box::pin(stream)
}

#[async_trait]
impl PluginAdapter for TargonProvider {
    fn name(&self) -> &str {
        "targon"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, FerryError> {
        // No network probe: a completion would consume tokens.
        if self.api_key.is_none() {
            return Ok(HealthStatus::Degraded(format!(
                "no Targon API key configured (set targon.api_key or {API_KEY_ENV})"
            )));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FerryError> {
        debug!("Targon provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for TargonProvider {
    fn model(&self) -> &'static ModelInfo {
        self.get_model()
    }

    async fn create_message(
        &self,
        system_prompt: &str,
        messages: &[ConversationMessage],
    ) -> Result<FragmentStream, FerryError> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            FerryError::Config(format!(
                "Targon API key is required. Set targon.api_key in config or the {API_KEY_ENV} environment variable."
            ))
        })?;

        let request = self.build_request(system_prompt, messages);
        let client = self.client.clone();
        let tools = Arc::clone(&self.tools);
        let model_id = self.model.id;
        let started = Instant::now();

        Ok(boxed(try_stream! {
            let mut request = request;
            let mut mode = ConsumeMode::Full;

            loop {
                let mut state = ResponseState::new(mode, Arc::clone(&tools));

                let failure = match client.stream_chat(&request, &api_key).await {
                    Ok(mut events) => {
                        let mut failure = None;
                        while let Some(event) = events.next().await {
                            match event {
                                Ok(chunk) => {
                                    for fragment in state.process(&chunk) {
                                        yield fragment;
                                    }
                                }
                                Err(err) => {
                                    failure = Some(err);
                                    break;
                                }
                            }
                        }
                        failure
                    }
                    Err(err) => Some(err),
                };

                match failure {
                    None => {
                        let summary = state.into_summary(model_id, started.elapsed());
                        debug!(
                            id = %summary.id,
                            tokens_in = summary.metrics.tokens_in,
                            tokens_out = summary.metrics.tokens_out,
                            elapsed_ms = summary.metrics.elapsed_ms,
                            "Targon stream complete"
                        );
                        yield summary.into_fragment()?;
                        break;
                    }
                    Some(err) if mode == ConsumeMode::Full && hints::is_service_unavailable(&err) => {
                        warn!(error = %err, "Targon unavailable, retrying once with a simplified request");
                        request = fallback_request(&request);
                        mode = ConsumeMode::ContentOnly;
                    }
                    Some(err) => {
                        Err::<(), FerryError>(hints::describe_error(err))?;
                    }
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::Role;
    use tracing_test::traced_test;

    fn config() -> FerryConfig {
        let mut config = FerryConfig::default();
        config.targon.base_url = "http://127.0.0.1:9".into();
        config
    }

    fn provider(config: &FerryConfig) -> TargonProvider {
        TargonProvider::with_api_key(config, Some(SecretString::from("test-key".to_string())))
            .unwrap()
    }

    #[test]
    fn unknown_model_resolves_to_default() {
        let mut config = config();
        config.targon.model_id = Some("no/such-model".into());
        let provider = provider(&config);
        assert_eq!(provider.get_model().id, models::TARGON_DEFAULT_MODEL_ID);
    }

    #[test]
    fn known_model_is_used() {
        let mut config = config();
        let entry = &models::TARGON_MODELS[1];
        config.targon.model_id = Some(entry.id.to_string());
        let provider = provider(&config);
        assert_eq!(provider.model(), entry);
    }

    #[test]
    fn request_puts_rewritten_system_prompt_first() {
        let provider = provider(&config());
        let request = provider.build_request("Answer.", &[ConversationMessage::user("Hi")]);

        assert_eq!(
            request.messages,
            vec![
                ChatMessage {
                    role: "system".into(),
                    content: make_prompt_concise("Answer."),
                },
                ChatMessage {
                    role: "user".into(),
                    content: "Hi".into(),
                },
            ]
        );
        assert!(request.stream);
        assert_eq!(request.temperature, 0.7);
        assert!(request.tools.is_none());
    }

    #[test]
    fn rewriting_can_be_disabled() {
        let mut config = config();
        config.targon.concise_prompt = false;
        let provider = provider(&config);
        let request = provider.build_request("Answer.", &[ConversationMessage::user("Hi")]);
        assert_eq!(request.messages[0].content, "Answer.");
    }

    #[test]
    fn max_tokens_falls_back_when_model_has_none() {
        let mut config = config();
        let unbounded = models::TARGON_MODELS
            .iter()
            .find(|m| m.max_tokens.is_none())
            .unwrap();
        config.targon.model_id = Some(unbounded.id.to_string());
        let request = provider(&config).build_request("s", &[ConversationMessage::user("Hi")]);
        assert_eq!(request.max_tokens, FALLBACK_MAX_TOKENS);
    }

    #[test]
    fn structured_content_and_roles_are_copied() {
        let provider = provider(&config());
        let blocks = serde_json::json!([{"type": "text", "text": "yo"}]);
        let messages = [
            ConversationMessage::user("Hi"),
            ConversationMessage::new(Role::Assistant, blocks.clone()),
        ];
        let request = provider.build_request("s", &messages);
        assert_eq!(request.messages[2].role, "assistant");
        let sent: serde_json::Value = serde_json::from_str(&request.messages[2].content).unwrap();
        assert_eq!(sent, blocks);
    }

    #[test]
    fn tool_attached_when_marker_present() {
        let provider = provider(&config());
        let request = provider.build_request(
            "s",
            &[ConversationMessage::user("use ask_followup_question if unsure")],
        );
        let tools = request.tools.expect("tool definitions");
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].function.name, AskFollowupQuestion::NAME);
    }

    #[test]
    fn custom_formatter_is_attached_by_its_trigger() {
        struct Lookup;

        impl ToolFormatter for Lookup {
            fn name(&self) -> &str {
                "lookup"
            }

            fn trigger(&self) -> &str {
                "look it up"
            }

            fn definition(&self) -> types::ToolDefinition {
                types::ToolDefinition::function("lookup", "Looks things up.", serde_json::json!({"type": "object"}))
            }

            fn format(&self, arguments: &serde_json::Value) -> Option<String> {
                Some(arguments.to_string())
            }
        }

        let provider = provider(&config()).with_tool_formatter(Arc::new(Lookup));
        let request =
            provider.build_request("s", &[ConversationMessage::user("please look it up")]);
        let names: Vec<_> = request
            .tools
            .unwrap()
            .into_iter()
            .map(|t| t.function.name)
            .collect();
        assert_eq!(names, vec!["lookup"]);
    }

    #[test]
    fn marker_in_system_prompt_does_not_attach_tools() {
        let provider = provider(&config());
        let request =
            provider.build_request("You may call ask_followup_question.", &[ConversationMessage::user("Hi")]);
        assert!(request.tools.is_none());
    }

    #[test]
    fn fallback_request_is_simplified() {
        let provider = provider(&config());
        let primary = provider.build_request(
            "s",
            &[ConversationMessage::user("ask_followup_question please")],
        );
        let retry = fallback_request(&primary);
        assert_eq!(retry.messages, primary.messages);
        assert!(retry.tools.is_none());
        assert_eq!(retry.temperature, 0.0);
        assert_eq!(retry.max_tokens, RETRY_MAX_TOKENS);
        assert!(retry.stream);
    }

    #[test]
    #[traced_test]
    fn request_log_truncates_previews() {
        let provider = provider(&config());
        let long = "x".repeat(80);
        provider.build_request("s", &[ConversationMessage::user(long.as_str())]);

        assert!(logs_contain(&"x".repeat(PREVIEW_CHARS)));
        assert!(!logs_contain(&"x".repeat(PREVIEW_CHARS + 1)));
    }

    #[test]
    fn empty_config_key_counts_as_absent() {
        // Only the config branch is deterministic here; the env may be set.
        let key = resolve_api_key(Some("from-config"));
        assert!(key.is_some());
        let fallback = resolve_api_key(Some(""));
        assert_eq!(fallback.is_some(), std::env::var(API_KEY_ENV).is_ok_and(|k| !k.is_empty()));
    }

    #[tokio::test]
    async fn missing_key_fails_before_streaming() {
        let provider = TargonProvider::with_api_key(&config(), None).unwrap();
        let result = provider
            .create_message("s", &[ConversationMessage::user("Hi")])
            .await;
        match result {
            Err(FerryError::Config(message)) => assert!(message.contains(API_KEY_ENV)),
            Err(other) => panic!("expected Config error, got {other:?}"),
            Ok(_) => panic!("expected Config error, got a stream"),
        }
    }

    #[tokio::test]
    async fn health_reflects_key_presence() {
        let with_key = provider(&config());
        assert_eq!(with_key.health_check().await.unwrap(), HealthStatus::Healthy);

        let without_key = TargonProvider::with_api_key(&config(), None).unwrap();
        assert!(matches!(
            without_key.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
        assert_eq!(without_key.name(), "targon");
        assert!(without_key.shutdown().await.is_ok());
    }
}
