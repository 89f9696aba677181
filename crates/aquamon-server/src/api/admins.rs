use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aquamon_storage::{auth::hash_password, AdminRow, StorageError};

use crate::api::{error_response, ApiError};
use crate::state::AppState;

/// Admin record as returned by the management endpoints; the password hash
/// never leaves the storage layer.
#[derive(Serialize, ToSchema)]
pub struct AdminOut {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AdminRow> for AdminOut {
    fn from(row: AdminRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            role: row.role,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateAdminRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Defaults to `admin` when omitted.
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

/// Lists every admin account, newest first.
#[utoipa::path(
    get,
    path = "/admins",
    tag = "Admins",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All admin accounts", body = Vec<AdminOut>),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Caller is not a superadmin", body = ApiError),
        (status = 500, description = "Storage failure", body = ApiError)
    )
)]
pub async fn list_admins(State(state): State<AppState>) -> Response {
    match state.store.list_admins().await {
        Ok(rows) => Json(rows.into_iter().map(AdminOut::from).collect::<Vec<_>>()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list admins");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

/// Creates an admin account. No uniqueness pre-check: a duplicate email
/// surfaces from the storage unique constraint and maps to 409.
#[utoipa::path(
    post,
    path = "/admins",
    tag = "Admins",
    security(("bearer_auth" = [])),
    request_body = CreateAdminRequest,
    responses(
        (status = 200, description = "Created admin account", body = AdminOut),
        (status = 400, description = "Missing email or password", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Caller is not a superadmin", body = ApiError),
        (status = 409, description = "Email already exists", body = ApiError),
        (status = 500, description = "Storage failure", body = ApiError)
    )
)]
pub async fn create_admin(
    State(state): State<AppState>,
    Json(req): Json<CreateAdminRequest>,
) -> Response {
    let (email, password) = match (req.email.as_deref(), req.password.as_deref()) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            return error_response(StatusCode::BAD_REQUEST, "Email and password are required");
        }
    };
    let role = req.role.as_deref().unwrap_or("admin");

    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "Failed to hash password");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
        }
    };

    match state.store.create_admin(email, &password_hash, role).await {
        Ok(row) => {
            tracing::info!(admin_id = row.id, email = %row.email, role = %row.role, "Admin created");
            Json(AdminOut::from(row)).into_response()
        }
        Err(StorageError::Conflict { .. }) => {
            error_response(StatusCode::CONFLICT, "Email already exists")
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create admin");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

/// Deactivates an admin account (soft delete). No existence check: unknown
/// ids update nothing and still answer ok, so the operation is idempotent.
#[utoipa::path(
    delete,
    path = "/admins/{id}",
    tag = "Admins",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Admin id")
    ),
    responses(
        (status = 200, description = "Account deactivated", body = OkResponse),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Caller is not a superadmin", body = ApiError),
        (status = 500, description = "Storage failure", body = ApiError)
    )
)]
pub async fn deactivate_admin(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    match state.store.deactivate_admin(id).await {
        Ok(()) => {
            tracing::info!(admin_id = id, "Admin deactivated");
            Json(OkResponse { ok: true }).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to deactivate admin");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}
