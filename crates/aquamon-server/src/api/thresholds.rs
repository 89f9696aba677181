use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use aquamon_storage::ThresholdsUpdate;

use crate::api::{error_response, ApiError};
use crate::auth::Claims;
use crate::state::AppState;

/// Update request. Fields are deliberately loose (`Value`): clients have
/// historically sent numbers as strings, so each field is coerced
/// individually and a failure names the offending field.
#[derive(Deserialize, ToSchema)]
pub struct UpdateThresholdsRequest {
    #[serde(default)]
    pub sal_low: Value,
    #[serde(default)]
    pub sal_high: Value,
    #[serde(default)]
    pub ph_low: Value,
    #[serde(default)]
    pub ph_high: Value,
    #[serde(default)]
    pub temp_low: Value,
    #[serde(default)]
    pub temp_high: Value,
    #[serde(default)]
    pub bat_low: Value,
    #[serde(default)]
    pub offline_minutes: Value,
}

/// Coerces a JSON number or numeric string to a finite f64. A missing field
/// deserializes to `Value::Null` and fails here like any other bad input.
fn coerce_f64(field: &'static str, value: &Value) -> Result<f64, String> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid value for {field}")),
    }
}

/// Coerces a JSON number or numeric string to an i32. Fractional values are
/// rejected rather than truncated.
fn coerce_i32(field: &'static str, value: &Value) -> Result<i32, String> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match parsed.and_then(|v| i32::try_from(v).ok()) {
        Some(v) => Ok(v),
        None => Err(format!("Invalid value for {field}")),
    }
}

impl UpdateThresholdsRequest {
    /// Validates every field; the error is the 400 message for the first
    /// field that fails. No cross-field low<high relationship is enforced.
    fn coerce(&self) -> Result<ThresholdsUpdate, String> {
        Ok(ThresholdsUpdate {
            sal_low: coerce_f64("sal_low", &self.sal_low)?,
            sal_high: coerce_f64("sal_high", &self.sal_high)?,
            ph_low: coerce_f64("ph_low", &self.ph_low)?,
            ph_high: coerce_f64("ph_high", &self.ph_high)?,
            temp_low: coerce_f64("temp_low", &self.temp_low)?,
            temp_high: coerce_f64("temp_high", &self.temp_high)?,
            bat_low: coerce_f64("bat_low", &self.bat_low)?,
            offline_minutes: coerce_i32("offline_minutes", &self.offline_minutes)?,
        })
    }
}

/// Current threshold configuration. Public: sensor gateways poll this
/// without credentials. The singleton row is created with default bounds on
/// first access.
#[utoipa::path(
    get,
    path = "/thresholds",
    tag = "Thresholds",
    responses(
        (status = 200, description = "Threshold configuration"),
        (status = 500, description = "Storage failure", body = ApiError)
    )
)]
pub async fn get_thresholds(State(state): State<AppState>) -> Response {
    match state.store.get_or_seed_thresholds().await {
        Ok(row) => Json(row).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load thresholds");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

/// Replaces the threshold configuration. Any authenticated admin may update;
/// the caller's id is recorded as `updated_by`.
#[utoipa::path(
    put,
    path = "/thresholds",
    tag = "Thresholds",
    security(("bearer_auth" = [])),
    request_body = UpdateThresholdsRequest,
    responses(
        (status = 200, description = "Updated threshold configuration"),
        (status = 400, description = "A field failed numeric coercion", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 500, description = "Storage failure", body = ApiError)
    )
)]
pub async fn update_thresholds(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateThresholdsRequest>,
) -> Response {
    let update = match req.coerce() {
        Ok(update) => update,
        Err(msg) => {
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match state.store.update_thresholds(update, claims.sub).await {
        Ok(row) => {
            tracing::info!(admin_id = claims.sub, "Thresholds updated");
            Json(row).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to update thresholds");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}
