// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error classification and remedy hints for provider failures.

use ferry_core::FerryError;

/// Remedy hints keyed by the status code they are matched against.
const STATUS_HINTS: &[(&str, &str)] = &[
    (
        "401",
        "Authentication failed: the Targon API key is missing, invalid, or revoked. Check targon.api_key or TARGON_API_KEY.",
    ),
    (
        "403",
        "Access denied: the API key is not permitted to use this model or endpoint. Check the key's permissions.",
    ),
    (
        "404",
        "Not found: the model id or base URL is wrong. Check targon.model_id and targon.base_url.",
    ),
    (
        "429",
        "Rate limited: too many requests or quota exhausted. Wait before retrying or check your plan limits.",
    ),
    (
        "500",
        "Targon had an internal server error. This is usually temporary; try again shortly.",
    ),
    (
        "502",
        "Bad gateway: Targon's upstream model server did not respond correctly. Try again or pick another model.",
    ),
    (
        "503",
        "Service unavailable: Targon is overloaded or under maintenance. Try again later or pick another model.",
    ),
];

/// Returns the hint for the first known status code found in `text`.
pub fn remedy_hint(text: &str) -> Option<&'static str> {
    STATUS_HINTS
        .iter()
        .find(|(code, _)| text.contains(code))
        .map(|(_, hint)| *hint)
}

/// Returns the hint registered for an exact status code.
pub fn hint_for_status(status: u16) -> Option<&'static str> {
    let code = status.to_string();
    STATUS_HINTS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, hint)| *hint)
}

/// True for the one failure the provider retries: HTTP 503, by status or by message.
pub fn is_service_unavailable(err: &FerryError) -> bool {
    err.status() == Some(503) || err.to_string().contains("503")
}

/// Wraps a failure into the single error raised to the caller.
///
/// The message embeds the HTTP status when known and ends with the remedy
/// hint selected from the error text. Configuration errors pass through.
pub fn describe_error(err: FerryError) -> FerryError {
    let (message, status, source) = match err {
        FerryError::Provider {
            message,
            status,
            source,
        } => (message, status, source),
        config @ FerryError::Config(_) => return config,
        other => (other.to_string(), None, Some(Box::new(other) as _)),
    };

    let mut description = match status {
        Some(code) => format!("Targon API error (status {code}): {message}"),
        None => format!("Targon API error: {message}"),
    };
    // A known status decides the hint; the text is only scanned without one.
    let hint = match status {
        Some(code) => hint_for_status(code),
        None => remedy_hint(&description),
    };
    if let Some(hint) = hint {
        description.push_str(". ");
        description.push_str(hint);
    }

    FerryError::Provider {
        message: description,
        status,
        source,
    }
}
