use axum::{extract::State, Json};

use crate::api::{LoginRequest, LoginResponse};
use crate::auth::{generate_jwt, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::server::AppState;

/// POST /auth/login - exchange credentials for a JWT
///
/// Input: `{ "username": "admin", "password": "..." }` (username may be an email)
///
/// Output: `{ "success": true, "data": { "token", "user", "expires_in" } }`
pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    payload
        .validate()
        .map_err(|field_errors| ApiError::validation_error("Invalid login form", Some(field_errors)))?;

    let user = match state.store.authenticate(&payload.username, &payload.password).await {
        Some(user) => user,
        None => {
            tracing::warn!("failed login for '{}'", payload.username.trim());
            return Err(ApiError::unauthorized("Invalid username or password"));
        }
    };

    let claims = Claims::new(&user);
    let token = generate_jwt(&claims)?;

    if crate::config::config().security.enable_audit_logging {
        tracing::info!(target: "audit", user = %user.id, role = %user.role, "login");
    }

    Ok(ApiResponse::success(LoginResponse {
        token,
        user,
        expires_in: claims.expires_in(),
    }))
}
