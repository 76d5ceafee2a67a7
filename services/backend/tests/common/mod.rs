//! Common test utilities for the interface and store-backed suites
#![allow(dead_code)]

use admin_api::{build_router, config::Config, db::Database, state::AppState};
use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use serde_json::Value;

pub const API_KEY: &str = "dev-key";

/// Configuration with every variable at its default
pub fn default_config() -> Config {
    Config::from_vars(|_| None).expect("default configuration is valid")
}

/// In-process server with no pool behind it
pub fn disabled_server() -> TestServer {
    server_with(Database::disabled())
}

pub fn server_with(db: Database) -> TestServer {
    let app = build_router(AppState::new(default_config(), db));
    TestServer::new(app).expect("Failed to start test server")
}

pub fn api_key_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-api-key"),
        HeaderValue::from_static(API_KEY),
    )
}

/// Attach the configured API key to a request
pub fn authed(request: TestRequest) -> TestRequest {
    let (name, value) = api_key_header();
    request.add_header(name, value)
}

/// Pull `(code, category)` out of a standard error body
pub fn error_code(body: &Value) -> (String, String) {
    let error = &body["error"];
    (
        error["code"].as_str().unwrap_or_default().to_string(),
        error["category"].as_str().unwrap_or_default().to_string(),
    )
}
