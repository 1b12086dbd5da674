use axum::{
    extract::State,
    Extension,
    http::header::LOCATION,
    response::IntoResponse,
};

use crate::api::{LogradouroDto, LogradouroRequest};
use crate::database::models::NewLogradouro;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, Message, PathId};
use crate::state::AppState;

const NOT_FOUND: &str = "Logradouro not found";

/// GET /api/logradouro
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<LogradouroDto>> {
    let logradouros = state.logradouros.get_all().await?;
    Ok(ApiResponse::success(logradouros.iter().map(LogradouroDto::from).collect()))
}

/// GET /api/logradouro/:id
pub async fn get(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<LogradouroDto> {
    match state.logradouros.get_by_id(id).await? {
        Some(logradouro) => Ok(ApiResponse::success(LogradouroDto::from(&logradouro))),
        None => Err(ApiError::not_found(NOT_FOUND)),
    }
}

/// POST /api/logradouro
///
/// `clienteId` is not checked here; an unknown Cliente fails at the foreign
/// key and surfaces as a server error.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<LogradouroRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let logradouro = state.logradouros.add(&NewLogradouro::from(payload)).await?;

    tracing::info!(
        "Logradouro {} created for cliente {} by {}",
        logradouro.id,
        logradouro.cliente_id,
        user.email
    );
    let location = format!("/api/logradouro/{}", logradouro.id);
    Ok((
        [(LOCATION, location)],
        ApiResponse::created(LogradouroDto::from(&logradouro)),
    ))
}

/// PUT /api/logradouro/:id
pub async fn update(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(payload): JsonBody<LogradouroRequest>,
) -> ApiResult<LogradouroDto> {
    match state.logradouros.update(id, &NewLogradouro::from(payload)).await? {
        Some(logradouro) => Ok(ApiResponse::success(LogradouroDto::from(&logradouro))),
        None => Err(ApiError::not_found(NOT_FOUND)),
    }
}

/// DELETE /api/logradouro/:id
pub async fn delete(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<Message> {
    if !state.logradouros.delete(id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(ApiResponse::success(Message::new("Logradouro deleted successfully")))
}
