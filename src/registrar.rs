// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Registrar allotment lookup client.
//!
//! Queries the registrar's allotment API for a single applicant key. The
//! API is keyed through request headers rather than the URL: the issue
//! code travels in `client_id` and the applicant key (PAN, application
//! number, or DP client id) in `reqparam`. A 404 from upstream means "no
//! records for this key" and is a valid lookup outcome, not a failure.

use crate::acquisition::http_client::HttpClient;
use crate::config::Config;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// How the applicant key should be interpreted by the registrar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryType {
    /// Permanent Account Number (tax id).
    #[default]
    Pan,
    /// IPO application number.
    AppNo,
    /// Depository participant client id.
    DpClient,
}

impl QueryType {
    /// Wire value for the registrar's `type` query parameter.
    pub fn as_wire(&self) -> &'static str {
        match self {
            QueryType::Pan => "pan",
            QueryType::AppNo => "appno",
            QueryType::DpClient => "dpclient",
        }
    }

    /// Map an application-type label from a client request. Unknown labels
    /// fall back to PAN, the registrar's default.
    pub fn from_application_type(label: &str) -> Self {
        match label {
            "APP_NO" => QueryType::AppNo,
            "DP_CLIENT" => QueryType::DpClient,
            _ => QueryType::Pan,
        }
    }
}

/// Errors from a registrar lookup. "No records" is not an error — see
/// [`AllotmentStatus::found`].
#[derive(Debug, Error)]
pub enum RegistrarError {
    /// The request never completed (DNS, TLS, timeout).
    #[error("registrar request failed: {0}")]
    Transport(anyhow::Error),
    /// The registrar answered with an unexpected HTTP status.
    #[error("registrar returned HTTP {0}")]
    Upstream(u16),
}

/// Outcome of a single allotment lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllotmentStatus {
    /// Whether the registrar had any record for the key.
    pub found: bool,
    /// Whether shares were allotted.
    pub allotted: bool,
    /// Number of shares allotted (0 when none or not found).
    pub shares: u64,
    /// Applicant name as recorded by the registrar, when present.
    pub holder_name: Option<String>,
    /// Raw registrar record for downstream display.
    pub record: Option<Value>,
}

impl AllotmentStatus {
    /// The "no records found" outcome.
    pub fn not_found() -> Self {
        Self {
            found: false,
            allotted: false,
            shares: 0,
            holder_name: None,
            record: None,
        }
    }
}

/// Client for the registrar's allotment query API.
#[derive(Clone)]
pub struct RegistrarClient {
    http: HttpClient,
    config: Config,
}

impl RegistrarClient {
    pub fn new(config: Config) -> Self {
        let http = HttpClient::new(config.timeout_ms);
        Self { http, config }
    }

    /// Reuse an existing HTTP client (shared connection pool).
    pub fn with_http(config: Config, http: HttpClient) -> Self {
        Self { http, config }
    }

    /// Look up allotment status for one applicant key under one issue.
    ///
    /// The key is uppercased before it is sent; the registrar matches
    /// case-sensitively on uppercase PANs.
    pub async fn check(
        &self,
        issue_code: &str,
        query: QueryType,
        key: &str,
    ) -> Result<AllotmentStatus, RegistrarError> {
        let url = format!("{}?type={}", self.config.api_url, query.as_wire());
        debug!("registrar lookup: issue={} type={}", issue_code, query.as_wire());

        let headers = self.lookup_headers(issue_code, key);
        let resp = self
            .http
            .get_with_headers(&url, &headers, self.config.timeout_ms)
            .await
            .map_err(RegistrarError::Transport)?;

        if resp.status == 404 {
            return Ok(AllotmentStatus::not_found());
        }
        if resp.status != 200 {
            return Err(RegistrarError::Upstream(resp.status));
        }

        let body: Value = serde_json::from_str(&resp.body).unwrap_or(Value::Null);
        Ok(interpret_response(&body))
    }

    fn lookup_headers(&self, issue_code: &str, key: &str) -> Vec<(String, String)> {
        let origin = self.config.base_url.trim_end_matches('/').to_string();
        vec![
            (
                "Accept".to_string(),
                "application/json, text/plain, */*".to_string(),
            ),
            ("Accept-Language".to_string(), "en-IN,en;q=0.9".to_string()),
            ("client_id".to_string(), issue_code.to_string()),
            ("reqparam".to_string(), key.trim().to_ascii_uppercase()),
            ("Origin".to_string(), origin.clone()),
            ("Referer".to_string(), format!("{origin}/")),
        ]
    }
}

/// Interpret a registrar response body.
///
/// The payload carries a `data` array; the first element is the applicant
/// record. Share counts live in `All_Shares` with `App_Shares` as the
/// fallback, and arrive as either JSON strings or numbers across issues.
pub fn interpret_response(body: &Value) -> AllotmentStatus {
    let record = body.get("data").and_then(|d| d.get(0)).cloned();

    let record = match record {
        Some(r) if !r.is_null() => r,
        _ => return AllotmentStatus::not_found(),
    };

    let shares = share_count(&record);
    let holder_name = record
        .get("Name")
        .and_then(Value::as_str)
        .map(str::to_string);

    AllotmentStatus {
        found: true,
        allotted: shares > 0,
        shares,
        holder_name,
        record: Some(record),
    }
}

/// Pull the share count out of a registrar record.
fn share_count(record: &Value) -> u64 {
    for key in ["All_Shares", "App_Shares"] {
        match record.get(key) {
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_u64() {
                    if v > 0 {
                        return v;
                    }
                }
            }
            Some(Value::String(s)) => {
                if let Ok(v) = s.trim().parse::<u64>() {
                    if v > 0 {
                        return v;
                    }
                }
            }
            _ => {}
        }
    }
    0
}

/// Normalize a PAN: trimmed and uppercased.
pub fn normalize_pan(pan: &str) -> String {
    pan.trim().to_ascii_uppercase()
}

/// Validate the PAN format: five letters, four digits, one letter.
pub fn is_valid_pan(pan: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("PAN format regex is valid")
    });
    re.is_match(&normalize_pan(pan))
}
