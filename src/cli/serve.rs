// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Start the REST API server.

use crate::config::Config;
use crate::rest::{self, AppState};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Default listen port when neither `--port` nor `$PORT` is set.
const DEFAULT_PORT: u16 = 5000;

/// Initialize tracing, build shared state, and serve until interrupted.
pub async fn run(port: Option<u16>) -> Result<()> {
    let default_level = if super::output::is_verbose() {
        "allot=debug"
    } else {
        "allot=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.parse().expect("valid directive")),
        )
        .init();

    let port = port
        .or_else(|| {
            std::env::var("PORT")
                .ok()
                .and_then(|v| v.trim().parse().ok())
        })
        .unwrap_or(DEFAULT_PORT);

    let config = Config::from_env();
    info!(
        "starting allot v{} (bundle: {})",
        env!("CARGO_PKG_VERSION"),
        config.bundle_url
    );

    let state = Arc::new(AppState::new(config));

    if !super::output::is_quiet() {
        eprintln!("  allot v{} listening on port {port}", env!("CARGO_PKG_VERSION"));
    }

    rest::start(port, state).await
}
