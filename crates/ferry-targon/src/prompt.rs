// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt rewriting.

use tracing::debug;

/// Words that mark a prompt as already asking for short output.
const BREVITY_MARKERS: &[&str] = &["concise", "brief", "short"];

/// Appended to prompts that do not ask for brevity themselves.
pub const CONCISE_INSTRUCTION: &str = "\n\nIMPORTANT: Keep responses concise and to the point. \
Do not explain your reasoning unless asked. Prefer short answers, minimal prose, \
and code or commands over descriptions of them.";

/// Returns the prompt with [`CONCISE_INSTRUCTION`] appended, unless it
/// already mentions brevity (case-insensitive).
pub fn make_prompt_concise(system_prompt: &str) -> String {
    let lowered = system_prompt.to_lowercase();
    if let Some(marker) = BREVITY_MARKERS.iter().find(|m| lowered.contains(*m)) {
        debug!(marker, "system prompt already asks for brevity");
        return system_prompt.to_string();
    }

    debug!("appending conciseness instruction to system prompt");
    format!("{system_prompt}{CONCISE_INSTRUCTION}")
}
