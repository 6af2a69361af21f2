// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Ferry configuration system.

use std::io::Write;

use ferry_config::diagnostic::ConfigError;
use ferry_config::model::{DEFAULT_TARGON_BASE_URL, FerryConfig};
use ferry_config::{load_and_validate_str, load_config_from_path, load_config_from_str};
use serial_test::serial;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_ferry_config() {
    let toml = r#"
[targon]
api_key = "sn4_test"
model_id = "deepseek-ai/DeepSeek-R1"
base_url = "http://localhost:8080/v1"
concise_prompt = false
request_timeout_secs = 30

[logging]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.targon.api_key.as_deref(), Some("sn4_test"));
    assert_eq!(config.targon.model_id.as_deref(), Some("deepseek-ai/DeepSeek-R1"));
    assert_eq!(config.targon.base_url, "http://localhost:8080/v1");
    assert!(!config.targon.concise_prompt);
    assert_eq!(config.targon.request_timeout_secs, Some(30));
    assert_eq!(config.logging.level, "debug");
}

/// Missing sections use defaults without error.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert!(config.targon.api_key.is_none());
    assert!(config.targon.model_id.is_none());
    assert_eq!(config.targon.base_url, DEFAULT_TARGON_BASE_URL);
    assert!(config.targon.concise_prompt);
    assert!(config.targon.request_timeout_secs.is_none());
    assert_eq!(config.logging.level, "info");
}

/// Unknown field in [targon] is rejected.
#[test]
fn unknown_field_in_targon_produces_error() {
    let toml = r#"
[targon]
api_kye = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("api_kye"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[openrouter]
api_key = "x"
"#;

    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("openrouter"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unknown key diagnostics carry a suggestion and the valid key list.
#[test]
fn diagnostic_unknown_key_suggests_correction() {
    let toml = r#"
[targon]
modle_id = "x"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "modle_id"
                && suggestion.as_deref() == Some("model_id")
                && valid_keys.contains("base_url")
        })
    });
    assert!(found, "expected UnknownKey for modle_id, got: {errors:?}");
}

/// Wrong value type is reported.
#[test]
fn diagnostic_invalid_type() {
    let toml = r#"
[targon]
concise_prompt = "sometimes"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Other(_))),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after deserialization.
#[test]
fn validation_rejects_non_http_base_url() {
    let toml = r#"
[targon]
base_url = "api.targon.com/v1"
"#;

    let errors = load_and_validate_str(toml).expect_err("scheme-less URL should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("targon.base_url"))
    }));
}

/// ConfigError renders with miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "modle_id".to_string(),
        suggestion: Some("model_id".to_string()),
        valid_keys: "api_key, model_id, base_url".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().expect("should have help").to_string();
    assert!(help.contains("did you mean `model_id`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("modle_id"));
}

/// Dotted figment keys override file values.
#[test]
fn dotted_override_sets_api_key() {
    use figment::{Figment, providers::Serialized};

    let config: FerryConfig = Figment::new()
        .merge(Serialized::defaults(FerryConfig::default()))
        .merge(("targon.api_key", "from-override"))
        .extract()
        .expect("should set api_key via dot notation");

    assert_eq!(config.targon.api_key.as_deref(), Some("from-override"));
}

/// FERRY_TARGON_API_KEY maps to targon.api_key, not targon.api.key.
#[test]
#[serial]
fn env_var_overrides_file_value() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[targon]\napi_key = \"from-file\"\nmodel_id = \"Qwen/Qwen2.5-72B-Instruct\"")
        .expect("write config");

    // SAFETY: serialized with other env-touching tests.
    unsafe { std::env::set_var("FERRY_TARGON_API_KEY", "from-env") };
    let result = load_config_from_path(file.path());
    unsafe { std::env::remove_var("FERRY_TARGON_API_KEY") };

    let config = result.expect("config should load");
    assert_eq!(config.targon.api_key.as_deref(), Some("from-env"));
    assert_eq!(
        config.targon.model_id.as_deref(),
        Some("Qwen/Qwen2.5-72B-Instruct")
    );
}

/// Section-prefixed env vars reach nested keys in every section.
#[test]
#[serial]
fn env_vars_map_to_nested_keys() {
    // SAFETY: serialized with other env-touching tests.
    unsafe {
        std::env::set_var("FERRY_LOGGING_LEVEL", "debug");
        std::env::set_var("FERRY_TARGON_REQUEST_TIMEOUT_SECS", "30");
    }
    let result = load_config_from_path(std::path::Path::new("/nonexistent/ferry.toml"));
    unsafe {
        std::env::remove_var("FERRY_LOGGING_LEVEL");
        std::env::remove_var("FERRY_TARGON_REQUEST_TIMEOUT_SECS");
    }

    let config = result.expect("config should load");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.targon.request_timeout_secs, Some(30));
}

/// Missing config files are silently skipped.
#[test]
#[serial]
fn missing_config_file_yields_defaults() {
    let config = load_config_from_path(std::path::Path::new("/nonexistent/ferry.toml"))
        .expect("missing file should be skipped");
    assert_eq!(config.targon.base_url, DEFAULT_TARGON_BASE_URL);
}
