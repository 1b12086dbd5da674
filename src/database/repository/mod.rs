//! Repository ports for the three persisted entities.
//!
//! Each trait has a PostgreSQL implementation that routes every mutation
//! through a stored function, and the in-process implementation in
//! [`crate::database::memory`].

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Cliente, Logradouro, NewCliente, NewLogradouro, NewUser, User};

pub mod cliente;
pub mod logradouro;
pub mod user;

pub use cliente::PgClienteRepository;
pub use logradouro::PgLogradouroRepository;
pub use user::PgUserRepository;

/// Name of the UNIQUE constraint on `clientes.email`
pub const CLIENTE_EMAIL_CONSTRAINT: &str = "clientes_email_key";
/// Name of the UNIQUE constraint on `users.username`
pub const USER_USERNAME_CONSTRAINT: &str = "users_username_key";
/// Name of the UNIQUE constraint on `users.email`
pub const USER_EMAIL_CONSTRAINT: &str = "users_email_key";

#[async_trait]
pub trait ClienteRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> Result<Option<Cliente>, DatabaseError>;

    /// All Clientes with their Logradouros, ordered by id.
    async fn get_all(&self) -> Result<Vec<Cliente>, DatabaseError>;

    /// Insert and return the stored row. A duplicate email is reported as
    /// [`DatabaseError::UniqueViolation`].
    async fn add(&self, cliente: &NewCliente) -> Result<Cliente, DatabaseError>;

    /// Returns `None` when no Cliente has this id.
    async fn update(&self, id: i32, cliente: &NewCliente) -> Result<Option<Cliente>, DatabaseError>;

    /// Returns `false` when no Cliente has this id. Removes child Logradouros.
    async fn delete(&self, id: i32) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait LogradouroRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> Result<Option<Logradouro>, DatabaseError>;
    async fn get_all(&self) -> Result<Vec<Logradouro>, DatabaseError>;

    /// Insert and return the stored row. An unknown `cliente_id` is reported
    /// as [`DatabaseError::ForeignKeyViolation`].
    async fn add(&self, logradouro: &NewLogradouro) -> Result<Logradouro, DatabaseError>;

    async fn update(
        &self,
        id: i32,
        logradouro: &NewLogradouro,
    ) -> Result<Option<Logradouro>, DatabaseError>;

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError>;
}

/// Identity store
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    /// Persist a new user. A taken username or email is reported as
    /// [`DatabaseError::UniqueViolation`] naming the violated constraint.
    async fn create(&self, user: &NewUser) -> Result<User, DatabaseError>;
}
