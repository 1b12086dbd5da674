use serde::{Deserialize, Serialize};

use crate::database::models::{Logradouro, NewLogradouro};

/// Body of `POST /api/logradouro` and `PUT /api/logradouro/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogradouroRequest {
    pub rua_cliente: String,
    pub cliente_id: i32,
}

impl From<LogradouroRequest> for NewLogradouro {
    fn from(req: LogradouroRequest) -> Self {
        Self {
            street: req.rua_cliente,
            cliente_id: req.cliente_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogradouroDto {
    pub id: i32,
    pub rua_cliente: String,
    pub cliente_id: i32,
}

impl From<&Logradouro> for LogradouroDto {
    fn from(l: &Logradouro) -> Self {
        Self {
            id: l.id,
            rua_cliente: l.street.clone(),
            cliente_id: l.cliente_id,
        }
    }
}
