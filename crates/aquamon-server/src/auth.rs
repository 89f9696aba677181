use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aquamon_storage::{auth::verify_password, AdminRow};

use crate::api::{error_response, ApiError};
use crate::state::AppState;

/// Identity claims carried by every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin id.
    pub sub: i32,
    pub email: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

pub fn create_token(secret: &str, admin: &AdminRow, expire_secs: u64) -> anyhow::Result<String> {
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = Claims {
        sub: admin.id,
        email: admin.email.clone(),
        role: admin.role.clone(),
        iat: now,
        exp: now + expire_secs,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn validate_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Bearer-token middleware. On success the decoded [`Claims`] are inserted
/// into request extensions, where handlers receive them as an explicit
/// `Extension<Claims>` parameter.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty());

    let token = match token {
        Some(token) => token,
        None => {
            return error_response(StatusCode::UNAUTHORIZED, "Missing token");
        }
    };

    match validate_token(&state.jwt_secret, token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(_) => error_response(StatusCode::UNAUTHORIZED, "Invalid token"),
    }
}

/// Role gate for admin-management routes. Layered inside [`auth_middleware`],
/// so the claims extension is present for any request that reaches it.
pub async fn require_superadmin(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<Claims>() {
        Some(claims) if claims.role == "superadmin" => next.run(req).await,
        Some(claims) => {
            tracing::warn!(admin_id = claims.sub, role = %claims.role, "Superadmin route denied");
            error_response(StatusCode::FORBIDDEN, "Superadmin required")
        }
        None => error_response(StatusCode::UNAUTHORIZED, "Missing token"),
    }
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Public admin summary returned by login. Never carries the hash.
#[derive(Serialize, ToSchema)]
pub struct AdminPublic {
    pub id: i32,
    pub email: String,
    pub role: String,
}

impl From<&AdminRow> for AdminPublic {
    fn from(row: &AdminRow) -> Self {
        Self {
            id: row.id,
            email: row.email.clone(),
            role: row.role.clone(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminPublic,
}

/// Authenticates an admin and issues a bearer token.
///
/// Unknown email, deactivated account and wrong password all answer with the
/// identical 401 body, so the response never reveals which check failed.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError)
    )
)]
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    let (email, password) = match (req.email.as_deref(), req.password.as_deref()) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            return error_response(StatusCode::BAD_REQUEST, "Email and password are required");
        }
    };

    let admin = match state.store.get_active_admin_by_email(email).await {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to query admin");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
        }
    };

    match verify_password(password, &admin.password_hash) {
        Ok(true) => {}
        _ => {
            return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
        }
    }

    match create_token(&state.jwt_secret, &admin, state.token_expire_secs) {
        Ok(token) => Json(LoginResponse {
            token,
            admin: AdminPublic::from(&admin),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create token");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}
