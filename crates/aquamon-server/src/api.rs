pub mod admins;
pub mod thresholds;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::state::AppState;

/// API error body. Plain HTTP status plus a message string; no structured
/// error codes.
#[derive(Serialize, ToSchema)]
pub struct ApiError {
    pub error: String,
}

pub fn error_response(status: StatusCode, msg: &str) -> Response {
    (
        status,
        Json(ApiError {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
}

/// Service health. Round-trips a trivial query against storage; a storage
/// failure degrades the response instead of propagating.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Storage reachable", body = HealthResponse),
        (status = 500, description = "Storage unreachable", body = HealthResponse)
    )
)]
async fn health(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(HealthResponse { ok: true, db: None }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    ok: false,
                    db: Some("down".to_string()),
                }),
            )
                .into_response()
        }
    }
}

/// Routes reachable without any authentication.
pub fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health))
        .routes(routes!(thresholds::get_thresholds))
}

pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(crate::auth::login))
}

/// Routes behind the bearer-token middleware (any valid token).
pub fn protected_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(thresholds::update_thresholds))
}

/// Routes behind the bearer-token middleware plus the superadmin role gate.
pub fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(admins::list_admins, admins::create_admin))
        .routes(routes!(admins::deactivate_admin))
}
