use axum::extract::State;

use crate::api::{LoginRequest, LoginResponse};
use crate::auth::password::verify_password;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;

/// Same message for unknown email and wrong password, so callers cannot
/// probe which emails are registered.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /api/auth/login - Authenticate user and receive JWT token
///
/// Expected Input:
/// ```json
/// { "email": "thomas@example.com", "password": "Secret#1" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "success": true, "data": { "token": "eyJhbGciOiJIUzI1NiI...", "expires_in": 3600 } }
/// ```
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let user = state.users.find_by_email(&payload.email).await?;

    let user = match user {
        Some(user) if verify_password(&payload.password, &user.password_hash) => user,
        _ => {
            tracing::warn!("Failed login for '{}'", payload.email);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let token = state.tokens.issue(user.id, &user.email)?;
    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(LoginResponse {
        token,
        expires_in: state.tokens.expires_in(),
    }))
}
