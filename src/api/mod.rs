//! Request and response bodies exposed over HTTP.

pub mod auth;
pub mod cliente;
pub mod logradouro;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use cliente::{ClienteDto, ClienteLogradouroDto, ClienteRequest};
pub use logradouro::{LogradouroDto, LogradouroRequest};
