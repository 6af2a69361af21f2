// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup for hosts that do not install their own.

use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber filtered to Ferry crates at `log_level`.
///
/// `RUST_LOG`, when set, takes precedence. Returns `false` if a global
/// subscriber was already installed.
pub fn init_tracing(log_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init()
        .is_ok()
}

/// Filter used when `RUST_LOG` is unset.
fn default_filter(log_level: &str) -> EnvFilter {
    EnvFilter::new(format!(
        "ferry_targon={log_level},ferry_config={log_level},ferry_core={log_level},warn"
    ))
}
