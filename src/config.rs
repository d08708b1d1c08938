// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration for upstream endpoints.
//!
//! The bundle URL is injected configuration rather than a hardcoded
//! version-pinned filename — the registrar redeploys its front end with a
//! new content hash in the asset name, and a pinned literal would break on
//! every deploy. Defaults match the currently observed deployment; every
//! value can be overridden via `ALLOT_*` environment variables.

use url::Url;

/// Default registrar site origin.
pub const DEFAULT_BASE_URL: &str = "https://ipostatus.kfintech.com";

/// Default path of the bundle carrying the embedded company list,
/// relative to the base URL.
pub const DEFAULT_BUNDLE_PATH: &str = "/static/js/main.0ec4c140.js";

/// Default registrar query API.
pub const DEFAULT_API_URL: &str =
    "https://0uz601ms56.execute-api.ap-south-1.amazonaws.com/prod/api/query";

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Upstream endpoint configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Registrar site origin, used for Origin/Referer headers.
    pub base_url: String,
    /// Absolute URL of the JavaScript bundle to scan for the company list.
    pub bundle_url: String,
    /// Registrar allotment query API URL.
    pub api_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bundle_url: join_url(DEFAULT_BASE_URL, DEFAULT_BUNDLE_PATH),
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Build a config from the environment, falling back to defaults.
    ///
    /// Recognized variables: `ALLOT_BASE_URL`, `ALLOT_BUNDLE_URL`,
    /// `ALLOT_API_URL`, `ALLOT_TIMEOUT_MS`. A bundle URL given as a bare
    /// path is resolved against the base URL.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("ALLOT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let bundle_url = match std::env::var("ALLOT_BUNDLE_URL") {
            Ok(v) if v.starts_with("http://") || v.starts_with("https://") => v,
            Ok(v) => join_url(&base_url, &v),
            Err(_) => join_url(&base_url, DEFAULT_BUNDLE_PATH),
        };

        let api_url =
            std::env::var("ALLOT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_ms = std::env::var("ALLOT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            base_url,
            bundle_url,
            api_url,
            timeout_ms,
        }
    }
}

/// Resolve a path against a base origin.
fn join_url(base: &str, path: &str) -> String {
    if let Ok(parsed) = Url::parse(base) {
        if let Ok(joined) = parsed.join(path) {
            return joined.to_string();
        }
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
