// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests for the REST API with a mocked upstream registrar.
//!
//! A wiremock server stands in for both the bundle CDN and the allotment
//! query API; requests are driven through the axum router directly.

use allot::config::Config;
use allot::rest::{router, AppState};
use assert_json_diff::assert_json_include;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build an app wired against the given mock upstream.
fn test_app(mock: &MockServer) -> Router {
    let config = Config {
        base_url: mock.uri(),
        bundle_url: format!("{}/static/js/main.test.js", mock.uri()),
        api_url: format!("{}/prod/api/query", mock.uri()),
        timeout_ms: 2_000,
    };
    router(Arc::new(AppState::new(config)))
}

/// Drive one request through the router and decode the JSON response.
async fn send(
    app: &Router,
    http_method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(v) => Request::builder()
            .method(http_method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .expect("request builds"),
        None => Request::builder()
            .method(http_method)
            .uri(uri)
            .body(Body::empty())
            .expect("request builds"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router never errors");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let mock = MockServer::start().await;
    let app = test_app(&mock);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn companies_extracts_from_escaped_bundle() {
    let mock = MockServer::start().await;

    let bundle = r#"!function(){JSON.parse('[{\"clientId\":\"111\",\"name\":\"Acme Corp\"},{\"clientId\":\"222\",\"name\":\"Beta Ltd\"}]')}();"#;
    Mock::given(method("GET"))
        .and(path("/static/js/main.test.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string(bundle))
        .mount(&mock)
        .await;

    let app = test_app(&mock);
    let (status, body) = send(&app, "GET", "/api/companies", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_json_include!(
        actual: body,
        expected: json!({
            "success": true,
            "count": 2,
            "companies": [
                { "code": "111", "name": "Acme Corp" },
                { "code": "222", "name": "Beta Ltd" },
            ],
        })
    );
}

#[tokio::test]
async fn companies_empty_when_bundle_missing() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/static/js/main.test.js"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock)
        .await;

    let app = test_app(&mock);
    let (status, body) = send(&app, "GET", "/api/companies", None).await;

    // A missing bundle is "no companies available", not a server error.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn check_allotment_uppercases_pan_and_reports_shares() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/prod/api/query"))
        .and(query_param("type", "pan"))
        .and(header("client_id", "111"))
        .and(header("reqparam", "ABCDE1234F"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "Name": "A Holder", "All_Shares": "120" }]
        })))
        .mount(&mock)
        .await;

    let app = test_app(&mock);
    let (status, body) = send(
        &app,
        "POST",
        "/api/check-allotment",
        Some(json!({ "clientId": "111", "pan": "abcde1234f" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_json_include!(
        actual: body,
        expected: json!({
            "success": true,
            "data": { "found": true, "allotted": true, "shares": 120 },
        })
    );
}

#[tokio::test]
async fn check_allotment_missing_fields_rejected() {
    let mock = MockServer::start().await;
    let app = test_app(&mock);

    let (status, body) = send(
        &app,
        "POST",
        "/api/check-allotment",
        Some(json!({ "clientId": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        "POST",
        "/api/check-allotment",
        Some(json!({ "pan": "ABCDE1234F" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_allotment_upstream_404_is_no_records() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/prod/api/query"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock)
        .await;

    let app = test_app(&mock);
    let (status, body) = send(
        &app,
        "POST",
        "/api/check-allotment",
        Some(json!({ "clientId": "111", "pan": "ABCDE1234F" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_json_include!(
        actual: body,
        expected: json!({
            "success": true,
            "data": { "found": false },
        })
    );
}

#[tokio::test]
async fn register_is_idempotent_on_email() {
    let mock = MockServer::start().await;
    let app = test_app(&mock);

    let (status, first) = send(
        &app,
        "POST",
        "/api/user/register",
        Some(json!({ "name": "Asha", "email": "asha@example.com", "phone": "99" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);

    let (_, second) = send(
        &app,
        "POST",
        "/api/user/register",
        Some(json!({ "name": "Someone Else", "email": "asha@example.com" })),
    )
    .await;
    assert_eq!(second["user"]["id"], first["user"]["id"]);
    assert_eq!(second["message"], "User already exists");
}

#[tokio::test]
async fn register_requires_name_and_email() {
    let mock = MockServer::start().await;
    let app = test_app(&mock);

    let (status, _) = send(
        &app,
        "POST",
        "/api/user/register",
        Some(json!({ "name": "No Email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_pan_validates_format() {
    let mock = MockServer::start().await;
    let app = test_app(&mock);

    let (_, reg) = send(
        &app,
        "POST",
        "/api/user/register",
        Some(json!({ "name": "Asha", "email": "asha@example.com" })),
    )
    .await;
    let user_id = reg["user"]["id"].as_str().expect("user id").to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/user/add-pan",
        Some(json!({ "userId": user_id, "panNumber": "not-a-pan" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        "POST",
        "/api/user/add-pan",
        Some(json!({ "userId": user_id, "panNumber": "abcde1234f", "holderName": "Asha" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["panCards"][0]["panNumber"], "ABCDE1234F");
}

#[tokio::test]
async fn add_pan_unknown_user_is_404() {
    let mock = MockServer::start().await;
    let app = test_app(&mock);

    let (status, _) = send(
        &app,
        "POST",
        "/api/user/add-pan",
        Some(json!({ "userId": "nope", "panNumber": "ABCDE1234F" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_check_isolates_per_pan_failures() {
    let mock = MockServer::start().await;

    // First PAN gets an allotment; every other lookup finds nothing.
    Mock::given(method("GET"))
        .and(path("/prod/api/query"))
        .and(header("reqparam", "AAAAA1111A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "Name": "Holder One", "All_Shares": 50 }]
        })))
        .with_priority(1)
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/prod/api/query"))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(10)
        .mount(&mock)
        .await;

    let app = test_app(&mock);

    let (_, reg) = send(
        &app,
        "POST",
        "/api/user/register",
        Some(json!({ "name": "Asha", "email": "asha@example.com" })),
    )
    .await;
    let user_id = reg["user"]["id"].as_str().expect("user id").to_string();

    for pan in ["AAAAA1111A", "BBBBB2222B"] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/user/add-pan",
            Some(json!({ "userId": user_id, "panNumber": pan })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(
        &app,
        "POST",
        "/api/check-allotment-bulk",
        Some(json!({ "userId": user_id, "clientId": "111", "companyName": "Acme" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_json_include!(
        actual: body.clone(),
        expected: json!({
            "success": true,
            "summary": { "total": 2, "allotted": 1, "notAllotted": 1 },
        })
    );

    let results = body["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["panNumber"], "AAAAA1111A");
    assert_eq!(results[0]["isAllotted"], true);
    assert_eq!(results[0]["shares"], 50);
    assert_eq!(results[0]["status"], "success");
    assert_eq!(results[1]["panNumber"], "BBBBB2222B");
    assert_eq!(results[1]["isAllotted"], false);
    assert_eq!(results[1]["status"], "not_found");
}

#[tokio::test]
async fn bulk_check_with_no_pans_is_empty_success() {
    let mock = MockServer::start().await;
    let app = test_app(&mock);

    let (_, reg) = send(
        &app,
        "POST",
        "/api/user/register",
        Some(json!({ "name": "Asha", "email": "asha@example.com" })),
    )
    .await;
    let user_id = reg["user"]["id"].as_str().expect("user id").to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/check-allotment-bulk",
        Some(json!({ "userId": user_id, "clientId": "111" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["results"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn get_user_roundtrip() {
    let mock = MockServer::start().await;
    let app = test_app(&mock);

    let (_, reg) = send(
        &app,
        "POST",
        "/api/user/register",
        Some(json!({ "name": "Asha", "email": "asha@example.com" })),
    )
    .await;
    let user_id = reg["user"]["id"].as_str().expect("user id").to_string();

    let (status, body) = send(&app, "GET", &format!("/api/user/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "asha@example.com");

    let (status, _) = send(&app, "GET", "/api/user/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
