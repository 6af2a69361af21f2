// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::FerryConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &FerryConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.targon.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "targon.base_url must not be empty".to_string(),
        });
    } else if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        errors.push(ConfigError::Validation {
            message: format!("targon.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    if config.targon.request_timeout_secs == Some(0) {
        errors.push(ConfigError::Validation {
            message: "targon.request_timeout_secs must be greater than 0".to_string(),
        });
    }

    if let Some(model_id) = &config.targon.model_id
        && model_id.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "targon.model_id must not be blank; omit it to use the default model"
                .to_string(),
        });
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
