use axum::extract::State;
use std::collections::HashMap;

use crate::api::RegisterRequest;
use crate::auth::password::{
    hash_password, validate_email_format, validate_username_format, PasswordPolicy,
};
use crate::database::models::NewUser;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, Message};
use crate::state::AppState;

/// POST /api/auth/register - Register new user account
///
/// Expected Input:
/// ```json
/// { "username": "thomas", "email": "thomas@example.com", "password": "Secret#1" }
/// ```
///
/// Fails with `VALIDATION_ERROR` and per-field messages when the username,
/// email or password break the rules, or when the username or email is taken.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> ApiResult<Message> {
    let mut field_errors = HashMap::new();

    if let Err(msg) = validate_username_format(&payload.username) {
        field_errors.insert("username".to_string(), msg);
    }
    if let Err(msg) = validate_email_format(&payload.email) {
        field_errors.insert("email".to_string(), msg);
    }
    if let Err(problems) = PasswordPolicy::default().validate(&payload.password) {
        field_errors.insert("password".to_string(), problems.join("; "));
    }

    if field_errors.is_empty() {
        if state.users.find_by_username(&payload.username).await?.is_some() {
            field_errors.insert("username".to_string(), username_taken(&payload.username));
        }
        if state.users.find_by_email(&payload.email).await?.is_some() {
            field_errors.insert("email".to_string(), email_taken(&payload.email));
        }
    }

    if !field_errors.is_empty() {
        tracing::info!("Registration rejected for '{}': {:?}", payload.username, field_errors.keys());
        return Err(ApiError::validation_error("Registration failed", Some(field_errors)));
    }

    let new_user = NewUser {
        username: payload.username.clone(),
        email: payload.email.clone(),
        password_hash: hash_password(&payload.password)?,
    };

    // A concurrent registration can still win the race to the constraint.
    match state.users.create(&new_user).await {
        Ok(user) => {
            tracing::info!("Registered user {} ({})", user.username, user.id);
            Ok(ApiResponse::success(Message::new("User registered successfully")))
        }
        Err(DatabaseError::UniqueViolation(constraint)) if constraint.contains("username") => {
            Err(ApiError::field_error("username", username_taken(&payload.username)))
        }
        Err(DatabaseError::UniqueViolation(_)) => {
            Err(ApiError::field_error("email", email_taken(&payload.email)))
        }
        Err(e) => Err(e.into()),
    }
}

fn username_taken(username: &str) -> String {
    format!("Username '{}' is already taken", username)
}

fn email_taken(email: &str) -> String {
    format!("Email '{}' is already taken", email)
}
