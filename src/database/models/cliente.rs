use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::logradouro::Logradouro;

/// Row shape returned by the `clientes` stored functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ClienteRow {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub logotipo: String,
}

/// Cliente with its eager-loaded Logradouros
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cliente {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub logo: String,
    pub logradouros: Vec<Logradouro>,
}

impl Cliente {
    pub fn from_row(row: ClienteRow, logradouros: Vec<Logradouro>) -> Self {
        Self {
            id: row.id,
            name: row.nome,
            email: row.email,
            logo: row.logotipo,
            logradouros,
        }
    }
}

/// Writable Cliente fields, used for both insert and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCliente {
    pub name: String,
    pub email: String,
    pub logo: String,
}
