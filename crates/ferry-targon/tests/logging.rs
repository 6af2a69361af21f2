// SPDX-FileCopyrightText: 2026 Ferry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Global subscriber installation. Kept in its own binary because it owns
//! the process-wide tracing dispatcher.

use ferry_targon::init_tracing;

#[test]
fn second_install_is_rejected() {
    assert!(init_tracing("debug"));
    assert!(!init_tracing("debug"));
}
