use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Logradouro {
    pub id: i32,
    #[sqlx(rename = "rua")]
    pub street: String,
    pub cliente_id: i32,
}

/// Writable Logradouro fields, used for both insert and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogradouro {
    pub street: String,
    pub cliente_id: i32,
}
