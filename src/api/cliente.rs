use serde::{Deserialize, Serialize};

use super::logradouro::LogradouroDto;
use crate::database::models::{Cliente, NewCliente};

/// Body of `POST /api/cliente` and `PUT /api/cliente/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteRequest {
    pub nome_cliente: String,
    pub email_cliente: String,
    pub logotipo_cliente: String,
}

impl From<ClienteRequest> for NewCliente {
    fn from(req: ClienteRequest) -> Self {
        Self {
            name: req.nome_cliente,
            email: req.email_cliente,
            logo: req.logotipo_cliente,
        }
    }
}

/// Cliente without its Logradouros, returned from create and update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteDto {
    pub id: i32,
    pub nome_cliente: String,
    pub email_cliente: String,
    pub logotipo_cliente: String,
}

impl From<&Cliente> for ClienteDto {
    fn from(c: &Cliente) -> Self {
        Self {
            id: c.id,
            nome_cliente: c.name.clone(),
            email_cliente: c.email.clone(),
            logotipo_cliente: c.logo.clone(),
        }
    }
}

/// Cliente with nested Logradouros, returned from list and get
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteLogradouroDto {
    pub id: i32,
    pub nome_cliente: String,
    pub email_cliente: String,
    pub logotipo_cliente: String,
    pub logradouros: Vec<LogradouroDto>,
}

impl From<Cliente> for ClienteLogradouroDto {
    fn from(c: Cliente) -> Self {
        Self {
            id: c.id,
            nome_cliente: c.name,
            email_cliente: c.email,
            logotipo_cliente: c.logo,
            logradouros: c.logradouros.iter().map(LogradouroDto::from).collect(),
        }
    }
}
