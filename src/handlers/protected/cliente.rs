use axum::{
    extract::State,
    Extension,
    http::header::LOCATION,
    response::IntoResponse,
};

use crate::api::{ClienteDto, ClienteLogradouroDto, ClienteRequest};
use crate::database::models::NewCliente;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, Message, PathId};
use crate::state::AppState;

const NOT_FOUND: &str = "Cliente not found";
const DUPLICATE_EMAIL: &str = "A Cliente with this email already exists";
const SAME_EMAIL: &str = "This email address is already in use by a Cliente";

/// GET /api/cliente - every Cliente with its Logradouros
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ClienteLogradouroDto>> {
    let clientes = state.clientes.get_all().await?;
    Ok(ApiResponse::success(
        clientes.into_iter().map(ClienteLogradouroDto::from).collect(),
    ))
}

/// GET /api/cliente/:id
pub async fn get(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<ClienteLogradouroDto> {
    match state.clientes.get_by_id(id).await? {
        Some(cliente) => Ok(ApiResponse::success(cliente.into())),
        None => Err(ApiError::not_found(NOT_FOUND)),
    }
}

/// POST /api/cliente
///
/// The email UNIQUE constraint is the duplicate check; nothing is inserted
/// when it fires.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<ClienteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_cliente = NewCliente::from(payload);

    let cliente = match state.clientes.add(&new_cliente).await {
        Ok(cliente) => cliente,
        Err(DatabaseError::UniqueViolation(_)) => {
            tracing::info!("Rejected duplicate cliente email from {}", user.user_id);
            return Err(ApiError::bad_request(DUPLICATE_EMAIL));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Cliente {} created by {}", cliente.id, user.email);
    let location = format!("/api/cliente/{}", cliente.id);
    Ok((
        [(LOCATION, location)],
        ApiResponse::created(ClienteDto::from(&cliente)),
    ))
}

/// PUT /api/cliente/:id
///
/// Rejects a body whose email equals the email already stored for this
/// Cliente. Collisions with another Cliente come back from the constraint.
pub async fn update(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(payload): JsonBody<ClienteRequest>,
) -> ApiResult<ClienteDto> {
    let existing = state
        .clientes
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    if existing.email == payload.email_cliente {
        return Err(ApiError::bad_request(SAME_EMAIL));
    }

    match state.clientes.update(id, &NewCliente::from(payload)).await {
        Ok(Some(cliente)) => Ok(ApiResponse::success(ClienteDto::from(&cliente))),
        // Deleted between the lookup and the update
        Ok(None) => Err(ApiError::not_found(NOT_FOUND)),
        Err(DatabaseError::UniqueViolation(_)) => Err(ApiError::bad_request(DUPLICATE_EMAIL)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/cliente/:id - removes the Cliente and its Logradouros
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    PathId(id): PathId,
) -> ApiResult<Message> {
    if !state.clientes.delete(id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    tracing::info!("Cliente {} deleted by {}", id, user.email);
    Ok(ApiResponse::success(Message::new("Cliente deleted successfully")))
}
