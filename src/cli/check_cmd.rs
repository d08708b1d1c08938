// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! One-shot allotment status check.

use crate::cli::output;
use crate::config::Config;
use crate::registrar::{QueryType, RegistrarClient};
use anyhow::{bail, Result};

/// Check allotment for one applicant key under one issue code.
pub async fn run(issue_code: &str, key: &str, query_type: &str) -> Result<()> {
    let query = match query_type {
        "pan" => QueryType::Pan,
        "appno" => QueryType::AppNo,
        "dpclient" => QueryType::DpClient,
        other => bail!("unknown query type '{other}' (expected pan, appno, or dpclient)"),
    };

    let config = Config::from_env();
    let client = RegistrarClient::new(config);
    let status = client.check(issue_code, query, key).await?;

    if output::is_json() {
        output::print_json(&serde_json::to_value(&status)?);
        return Ok(());
    }

    if !status.found {
        println!("No records found for this key.");
        return Ok(());
    }

    if let Some(name) = &status.holder_name {
        println!("Applicant: {name}");
    }
    if status.allotted {
        println!("Allotted: {} shares", status.shares);
    } else {
        println!("Not allotted.");
    }

    Ok(())
}
