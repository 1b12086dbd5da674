use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;

use super::ClienteRepository;
use crate::database::manager::DatabaseError;
use crate::database::models::{Cliente, ClienteRow, Logradouro, NewCliente};

/// Cliente persistence over the `sp_*_cliente` stored functions
pub struct PgClienteRepository {
    pool: PgPool,
}

impl PgClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn logradouros_for(&self, cliente_ids: &[i32]) -> Result<Vec<Logradouro>, DatabaseError> {
        if cliente_ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = sqlx::query_as::<_, Logradouro>(
            "SELECT id, rua, cliente_id FROM logradouros WHERE cliente_id = ANY($1) ORDER BY id",
        )
        .bind(cliente_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl ClienteRepository for PgClienteRepository {
    async fn get_by_id(&self, id: i32) -> Result<Option<Cliente>, DatabaseError> {
        let row = sqlx::query_as::<_, ClienteRow>("SELECT * FROM sp_select_cliente($1)")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let logradouros = self.logradouros_for(&[row.id]).await?;
                Ok(Some(Cliente::from_row(row, logradouros)))
            }
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Cliente>, DatabaseError> {
        let rows = sqlx::query_as::<_, ClienteRow>("SELECT * FROM sp_select_cliente(NULL)")
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut by_cliente: HashMap<i32, Vec<Logradouro>> = HashMap::new();
        for logradouro in self.logradouros_for(&ids).await? {
            by_cliente.entry(logradouro.cliente_id).or_default().push(logradouro);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let children = by_cliente.remove(&row.id).unwrap_or_default();
                Cliente::from_row(row, children)
            })
            .collect())
    }

    async fn add(&self, cliente: &NewCliente) -> Result<Cliente, DatabaseError> {
        let row = sqlx::query_as::<_, ClienteRow>("SELECT * FROM sp_insert_cliente($1, $2, $3)")
            .bind(&cliente.name)
            .bind(&cliente.email)
            .bind(&cliente.logo)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Inserted cliente {}", row.id);
        Ok(Cliente::from_row(row, vec![]))
    }

    async fn update(&self, id: i32, cliente: &NewCliente) -> Result<Option<Cliente>, DatabaseError> {
        let row = sqlx::query_as::<_, ClienteRow>("SELECT * FROM sp_update_cliente($1, $2, $3, $4)")
            .bind(id)
            .bind(&cliente.name)
            .bind(&cliente.email)
            .bind(&cliente.logo)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let logradouros = self.logradouros_for(&[row.id]).await?;
                tracing::info!("Updated cliente {}", id);
                Ok(Some(Cliente::from_row(row, logradouros)))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let row = sqlx::query_as::<_, ClienteRow>("SELECT * FROM sp_delete_cliente($1)")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if row.is_some() {
            tracing::info!("Deleted cliente {}", id);
        }
        Ok(row.is_some())
    }
}
