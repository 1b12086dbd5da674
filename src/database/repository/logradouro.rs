use async_trait::async_trait;
use sqlx::PgPool;

use super::LogradouroRepository;
use crate::database::manager::DatabaseError;
use crate::database::models::{Logradouro, NewLogradouro};

/// Logradouro persistence over the `sp_*_logradouro` stored functions
pub struct PgLogradouroRepository {
    pool: PgPool,
}

impl PgLogradouroRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogradouroRepository for PgLogradouroRepository {
    async fn get_by_id(&self, id: i32) -> Result<Option<Logradouro>, DatabaseError> {
        let row = sqlx::query_as::<_, Logradouro>("SELECT * FROM sp_select_logradouro($1)")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_all(&self) -> Result<Vec<Logradouro>, DatabaseError> {
        let rows = sqlx::query_as::<_, Logradouro>("SELECT * FROM sp_select_logradouro(NULL)")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn add(&self, logradouro: &NewLogradouro) -> Result<Logradouro, DatabaseError> {
        let row = sqlx::query_as::<_, Logradouro>("SELECT * FROM sp_insert_logradouro($1, $2)")
            .bind(&logradouro.street)
            .bind(logradouro.cliente_id)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Inserted logradouro {} for cliente {}", row.id, row.cliente_id);
        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        logradouro: &NewLogradouro,
    ) -> Result<Option<Logradouro>, DatabaseError> {
        let row = sqlx::query_as::<_, Logradouro>("SELECT * FROM sp_update_logradouro($1, $2, $3)")
            .bind(id)
            .bind(&logradouro.street)
            .bind(logradouro.cliente_id)
            .fetch_optional(&self.pool)
            .await?;

        if row.is_some() {
            tracing::info!("Updated logradouro {}", id);
        }
        Ok(row)
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let row = sqlx::query_as::<_, Logradouro>("SELECT * FROM sp_delete_logradouro($1)")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if row.is_some() {
            tracing::info!("Deleted logradouro {}", id);
        }
        Ok(row.is_some())
    }
}
