// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for the allotment checker.
//!
//! Route shapes and response envelopes follow the status site's own
//! conventions: every response carries a `success` flag, and wire field
//! names are camelCase (`clientId`, `panNumber`). Per-PAN failures inside
//! a bulk check are recorded as `not_found` results rather than failing
//! the whole batch.

use crate::acquisition::bundle;
use crate::acquisition::http_client::HttpClient;
use crate::config::Config;
use crate::registrar::{AllotmentStatus, QueryType, RegistrarClient, RegistrarError};
use crate::registry::{RegistryError, UserRegistry};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Shared state for all REST handlers.
pub struct AppState {
    pub config: Config,
    pub http: HttpClient,
    pub registrar: RegistrarClient,
    pub registry: UserRegistry,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http = HttpClient::new(config.timeout_ms);
        let registrar = RegistrarClient::with_http(config.clone(), http.clone());
        Self {
            config,
            http,
            registrar,
            registry: UserRegistry::new(),
            started_at: Instant::now(),
        }
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/companies", get(handle_companies))
        .route("/api/check-allotment", post(handle_check_allotment))
        .route("/api/check-allotment-bulk", post(handle_check_bulk))
        .route("/api/user/register", post(handle_register))
        .route("/api/user/add-pan", post(handle_add_pan))
        .route("/api/user/:user_id", get(handle_get_user))
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server on the given port.
pub async fn start(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Request bodies ──────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct CheckAllotmentBody {
    company: Option<String>,
    pan: Option<String>,
    application_type: Option<String>,
    client_id: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RegisterBody {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct AddPanBody {
    user_id: Option<String>,
    pan_number: Option<String>,
    holder_name: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct BulkBody {
    user_id: Option<String>,
    client_id: Option<String>,
    company_name: Option<String>,
}

/// One row in a bulk check response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkResult {
    pan_number: String,
    holder_name: String,
    is_allotted: bool,
    shares: u64,
    data: Option<Value>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// ── Handlers ────────────────────────────────────────────────────

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
    }))
}

/// Fetch the registrar bundle and return the extracted company list.
async fn handle_companies(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match bundle::fetch_companies(&state.config, &state.http).await {
        Ok(companies) => {
            let count = companies.len();
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "companies": companies,
                    "count": count,
                })),
            )
        }
        Err(e) => {
            error!("company bundle fetch failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Failed to fetch companies from registrar",
                    "error": format!("{e:#}"),
                })),
            )
        }
    }
}

/// Single allotment lookup for one PAN / application number.
async fn handle_check_allotment(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckAllotmentBody>,
) -> (StatusCode, Json<Value>) {
    let key = match body.pan.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => p,
        None => {
            return bad_request("PAN/Application Number is required");
        }
    };

    // The selected company's clientId wins over the legacy `company` field.
    let issue_code = [body.client_id.as_deref(), body.company.as_deref()]
        .into_iter()
        .flatten()
        .find(|c| !c.is_empty());
    let issue_code = match issue_code {
        Some(c) => c,
        None => {
            return bad_request("Company/Issue Code is required");
        }
    };

    let query = body
        .application_type
        .as_deref()
        .map(QueryType::from_application_type)
        .unwrap_or_default();

    match state.registrar.check(issue_code, query, key).await {
        Ok(status) => allotment_response(status),
        Err(e) => registrar_error_response(e),
    }
}

/// Register a new user (idempotent on email).
async fn handle_register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterBody>,
) -> (StatusCode, Json<Value>) {
    let name = body.name.as_deref().unwrap_or("").trim();
    let email = body.email.as_deref().unwrap_or("").trim();
    if name.is_empty() || email.is_empty() {
        return bad_request("Name and email are required");
    }

    let phone = body.phone.as_deref().unwrap_or("");
    let (user, created) = state.registry.register(name, email, phone).await;

    if created {
        info!("new user registered: {} ({})", user.name, user.email);
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "user": user,
            "message": if created { "User registered successfully" } else { "User already exists" },
        })),
    )
}

/// Attach a PAN card to a user.
async fn handle_add_pan(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddPanBody>,
) -> (StatusCode, Json<Value>) {
    let user_id = body.user_id.as_deref().unwrap_or("");
    let pan = body.pan_number.as_deref().unwrap_or("");
    if user_id.is_empty() || pan.is_empty() {
        return bad_request("User ID and PAN number are required");
    }

    let holder = body.holder_name.as_deref().unwrap_or("");
    match state.registry.add_pan(user_id, pan, holder).await {
        Ok((user, added)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "user": user,
                "message": if added { "PAN card added successfully" } else { "PAN card already added" },
            })),
        ),
        Err(RegistryError::UserNotFound) => not_found("User not found"),
        Err(RegistryError::InvalidPan(pan)) => {
            bad_request(&format!("Invalid PAN format: {pan}"))
        }
    }
}

/// Fetch a user and their PAN cards.
async fn handle_get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.registry.get(&user_id).await {
        Some(user) => (
            StatusCode::OK,
            Json(json!({ "success": true, "user": user })),
        ),
        None => not_found("User not found"),
    }
}

/// Check allotment for every PAN card of one user.
///
/// Queries run sequentially; the registrar rate-limits parallel lookups
/// from a single address.
async fn handle_check_bulk(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BulkBody>,
) -> (StatusCode, Json<Value>) {
    let user_id = body.user_id.as_deref().unwrap_or("");
    let issue_code = body.client_id.as_deref().unwrap_or("");
    if user_id.is_empty() || issue_code.is_empty() {
        return bad_request("User ID and Company clientId are required");
    }

    let user = match state.registry.get(user_id).await {
        Some(u) => u,
        None => return not_found("User not found"),
    };

    if user.pan_cards.is_empty() {
        return (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "results": [],
                "message": "No PAN cards added for this user",
            })),
        );
    }

    info!(
        "bulk check: {} PANs against issue {} ({})",
        user.pan_cards.len(),
        issue_code,
        body.company_name.as_deref().unwrap_or("?"),
    );

    let mut results: Vec<BulkResult> = Vec::with_capacity(user.pan_cards.len());
    for card in &user.pan_cards {
        match state
            .registrar
            .check(issue_code, QueryType::Pan, &card.pan_number)
            .await
        {
            Ok(status) => {
                let holder = if card.holder_name.is_empty() {
                    status.holder_name.clone().unwrap_or_default()
                } else {
                    card.holder_name.clone()
                };
                let found = status.found;
                results.push(BulkResult {
                    pan_number: card.pan_number.clone(),
                    holder_name: holder,
                    is_allotted: status.allotted,
                    shares: status.shares,
                    data: status.record,
                    status: if found { "success" } else { "not_found" },
                    error: if found {
                        None
                    } else {
                        Some("No records found".to_string())
                    },
                });
            }
            Err(e) => {
                warn!("bulk lookup failed for one PAN: {e}");
                results.push(BulkResult {
                    pan_number: card.pan_number.clone(),
                    holder_name: card.holder_name.clone(),
                    is_allotted: false,
                    shares: 0,
                    data: None,
                    status: "not_found",
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let allotted = results.iter().filter(|r| r.is_allotted).count();
    let total = results.len();
    info!("bulk check completed: {allotted} allotted out of {total}");

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "results": results,
            "summary": {
                "total": total,
                "allotted": allotted,
                "notAllotted": total - allotted,
            },
            "message": "Bulk allotment check completed",
        })),
    )
}

// ── Response helpers ────────────────────────────────────────────

fn allotment_response(status: AllotmentStatus) -> (StatusCode, Json<Value>) {
    if status.found {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": status,
                "message": "Allotment status fetched successfully",
            })),
        )
    } else {
        // Upstream 404 / empty data: a valid "no records" outcome.
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "found": false, "message": "No records found for this PAN" },
                "message": "No allotment records found",
            })),
        )
    }
}

fn registrar_error_response(e: RegistrarError) -> (StatusCode, Json<Value>) {
    error!("registrar lookup failed: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "message": "Failed to check allotment status",
            "error": e.to_string(),
        })),
    )
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "message": message })),
    )
}

fn not_found(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": message })),
    )
}
