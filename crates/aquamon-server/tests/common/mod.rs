#![allow(dead_code)]

use aquamon_server::app;
use aquamon_server::config::{AuthConfig, ServerConfig};
use aquamon_server::state::AppState;
use aquamon_storage::auth::hash_password;
use aquamon_storage::Store;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const SUPERADMIN_EMAIL: &str = "root@example.com";
pub const SUPERADMIN_PASSWORD: &str = "changeme";

pub struct TestContext {
    pub state: AppState,
    pub app: axum::Router,
}

/// Builds the real router over an in-memory database, seeded with one
/// superadmin account.
pub async fn build_test_context() -> TestContext {
    let store = Arc::new(
        Store::new("sqlite::memory:")
            .await
            .expect("in-memory store should initialize"),
    );

    let password_hash = hash_password(SUPERADMIN_PASSWORD).expect("hash should succeed");
    store
        .create_admin(SUPERADMIN_EMAIL, &password_hash, "superadmin")
        .await
        .expect("seed superadmin should insert");

    let config = ServerConfig {
        http_port: 3000,
        database_url: "sqlite::memory:".to_string(),
        cors_allowed_origins: Vec::new(),
        auth: AuthConfig {
            jwt_secret: Some(TEST_JWT_SECRET.to_string()),
            token_expire_secs: 3600,
            ..AuthConfig::default()
        },
    };

    let state = AppState {
        store,
        jwt_secret: Arc::new(TEST_JWT_SECRET.to_string()),
        token_expire_secs: config.auth.token_expire_secs,
        config: Arc::new(config),
    };

    let app = app::build_http_app(state.clone());

    TestContext { state, app }
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder = builder.header("Content-Type", "application/json");

    let req_body = body.unwrap_or(Value::Null).to_string();
    let req = builder
        .body(Body::from(req_body))
        .expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json)
}

pub async fn request_no_body(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let req = builder
        .body(Body::empty())
        .expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json)
}

pub async fn login_and_get_token(app: &axum::Router, email: &str, password: &str) -> String {
    let (status, body) = request_json(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login should succeed: {body}");
    body["token"]
        .as_str()
        .expect("login response should carry a token")
        .to_string()
}

/// A complete, valid PUT /thresholds body.
pub fn thresholds_body() -> Value {
    json!({
        "sal_low": 7.0,
        "sal_high": 13.0,
        "ph_low": 6.0,
        "ph_high": 9.0,
        "temp_low": 22.0,
        "temp_high": 30.0,
        "bat_low": 15.0,
        "offline_minutes": 20
    })
}
