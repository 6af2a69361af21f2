// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool formatters: turn streamed tool calls into tagged text blocks.
//!
//! A [`ToolFormatter`] owns one tool name. It decides when its definition is
//! attached to a request and how completed call arguments are rendered. The
//! [`ToolRegistry`] holds the formatters by name; `ask_followup_question` is
//! the only one registered by default.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use crate::types::{ChatMessage, ToolCallDelta, ToolDefinition};

/// Renders calls of one tool as text fragments.
pub trait ToolFormatter: Send + Sync {
    /// Tool (function) name.
    fn name(&self) -> &str;

    /// Substring that, found in a message, causes the definition to be attached.
    fn trigger(&self) -> &str {
        self.name()
    }

    /// Function definition sent to the provider.
    fn definition(&self) -> ToolDefinition;

    /// Renders complete call arguments. `None` means the arguments are not
    /// usable yet.
    fn format(&self, arguments: &Value) -> Option<String>;
}

/// Formatter for the "ask a follow-up question" tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct AskFollowupQuestion;

impl AskFollowupQuestion {
    pub const NAME: &'static str = "ask_followup_question";
}

impl ToolFormatter for AskFollowupQuestion {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            Self::NAME,
            "Ask the user a question to gather additional information needed to complete the task.",
            json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "The question to ask the user."
                    },
                    "options": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Optional answer choices for the user to pick from."
                    }
                },
                "required": ["question"]
            }),
        )
    }

    fn format(&self, arguments: &Value) -> Option<String> {
        let question = arguments.get("question")?.as_str()?;
        if question.is_empty() {
            return None;
        }

        let mut block = format!("<ask_followup_question>\n<question>{question}</question>\n");
        if let Some(options) = arguments.get("options").filter(|o| o.is_array()) {
            block.push_str(&format!("<options>{options}</options>\n"));
        }
        block.push_str("</ask_followup_question>");
        Some(block)
    }
}

/// Formatters keyed by tool name.
#[derive(Clone)]
pub struct ToolRegistry {
    formatters: HashMap<String, Arc<dyn ToolFormatter>>,
}

impl ToolRegistry {
    /// A registry with no formatters.
    pub fn empty() -> Self {
        Self {
            formatters: HashMap::new(),
        }
    }

    /// Adds or replaces the formatter for its tool name.
    pub fn register(&mut self, formatter: Arc<dyn ToolFormatter>) {
        self.formatters
            .insert(formatter.name().to_string(), formatter);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolFormatter>> {
        self.formatters.get(name)
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Definitions of every tool whose trigger appears in a message, sorted
    /// by name. `None` when no tool is triggered.
    pub fn definitions_for(&self, messages: &[ChatMessage]) -> Option<Vec<ToolDefinition>> {
        let mut triggered: Vec<_> = self
            .formatters
            .values()
            .filter(|f| messages.iter().any(|m| m.content.contains(f.trigger())))
            .collect();
        if triggered.is_empty() {
            return None;
        }
        triggered.sort_by(|a, b| a.name().cmp(b.name()));
        Some(triggered.into_iter().map(|f| f.definition()).collect())
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(AskFollowupQuestion));
        registry
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.formatters.keys().collect();
        names.sort();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}

#[derive(Debug, Default)]
struct PendingCall {
    name: Option<String>,
    arguments: String,
    emitted: bool,
}

/// Accumulates tool-call deltas by index and emits each call's rendered
/// text once its arguments parse.
#[derive(Debug)]
pub struct ToolCallAccumulator {
    registry: Arc<ToolRegistry>,
    calls: HashMap<u32, PendingCall>,
}

impl ToolCallAccumulator {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            calls: HashMap::new(),
        }
    }

    /// Applies one delta. Returns the rendered block the first time the
    /// accumulated arguments form a usable call of a registered tool.
    pub fn ingest(&mut self, delta: &ToolCallDelta) -> Option<String> {
        let call = self.calls.entry(delta.index).or_default();
        if let Some(function) = &delta.function {
            if let Some(name) = function.name.as_deref().filter(|n| !n.is_empty()) {
                call.name = Some(name.to_string());
            }
            if let Some(fragment) = &function.arguments {
                call.arguments.push_str(fragment);
            }
        }

        if call.emitted || call.arguments.is_empty() {
            return None;
        }
        let formatter = self.registry.get(call.name.as_deref()?)?;

        let arguments = match serde_json::from_str::<Value>(&call.arguments) {
            Ok(arguments) => arguments,
            Err(e) => {
                debug!(
                    tool = formatter.name(),
                    error = %e,
                    "tool call arguments not parseable yet, skipping"
                );
                return None;
            }
        };

        let text = formatter.format(&arguments)?;
        call.emitted = true;
        Some(text)
    }
}
