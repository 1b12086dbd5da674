use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::{JwtError, TokenIssuer};
use crate::config::AppConfig;
use crate::database::repository::{
    PgClienteRepository, PgLogradouroRepository, PgUserRepository,
};
use crate::database::{ClienteRepository, LogradouroRepository, MemoryStore, UserRepository};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: TokenIssuer,
    pub clientes: Arc<dyn ClienteRepository>,
    pub logradouros: Arc<dyn LogradouroRepository>,
    pub users: Arc<dyn UserRepository>,
    /// Present when backed by PostgreSQL; used by the health check.
    pub pool: Option<PgPool>,
}

impl AppState {
    /// State backed by the PostgreSQL stored functions.
    pub fn postgres(config: AppConfig, pool: PgPool) -> Result<Self, JwtError> {
        let tokens = TokenIssuer::new(&config.jwt)?;
        Ok(Self {
            config: Arc::new(config),
            tokens,
            clientes: Arc::new(PgClienteRepository::new(pool.clone())),
            logradouros: Arc::new(PgLogradouroRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            pool: Some(pool),
        })
    }

    /// State backed by a fresh in-process store.
    pub fn in_memory(config: AppConfig) -> Result<Self, JwtError> {
        let tokens = TokenIssuer::new(&config.jwt)?;
        let store = MemoryStore::new();
        Ok(Self {
            config: Arc::new(config),
            tokens,
            clientes: Arc::new(store.clone()),
            logradouros: Arc::new(store.clone()),
            users: Arc::new(store),
            pool: None,
        })
    }
}
