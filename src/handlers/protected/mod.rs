// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Routes here sit behind `jwt_auth_middleware`; a request only reaches a
// handler once its bearer token verified. Any authenticated user may use
// every operation.

pub mod cliente; // /api/cliente[/:id]
pub mod logradouro; // /api/logradouro[/:id]
