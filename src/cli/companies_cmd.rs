// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! One-shot company list fetch.

use crate::acquisition::bundle;
use crate::acquisition::http_client::HttpClient;
use crate::cli::output;
use crate::config::Config;
use anyhow::Result;

/// Fetch the bundle, extract the company list, and print it.
pub async fn run() -> Result<()> {
    let config = Config::from_env();
    let client = HttpClient::new(config.timeout_ms);

    let companies = bundle::fetch_companies(&config, &client).await?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "companies": companies,
            "count": companies.len(),
        }));
        return Ok(());
    }

    if companies.is_empty() {
        println!("No companies currently listed in the registrar bundle.");
        return Ok(());
    }

    println!("{} live IPO issues:", companies.len());
    for (i, company) in companies.iter().enumerate() {
        println!("{:>3}. [{}] {}", i + 1, company.code, company.name);
    }

    Ok(())
}
