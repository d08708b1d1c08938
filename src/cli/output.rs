// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Output helpers shared across CLI commands.
//!
//! Global flags arrive via environment variables set in `main` so every
//! module can check them without threading a context struct through.

use serde_json::Value;

/// Whether `--json` was passed.
pub fn is_json() -> bool {
    std::env::var("ALLOT_JSON").is_ok()
}

/// Whether `--quiet` was passed.
pub fn is_quiet() -> bool {
    std::env::var("ALLOT_QUIET").is_ok()
}

/// Whether `--verbose` was passed.
pub fn is_verbose() -> bool {
    std::env::var("ALLOT_VERBOSE").is_ok()
}

/// Print a JSON value to stdout, pretty unless quiet.
pub fn print_json(value: &Value) {
    if is_quiet() {
        println!("{value}");
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        );
    }
}
