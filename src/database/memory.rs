//! In-process store implementing every repository trait.
//!
//! Enforces the same constraints the PostgreSQL schema declares: unique
//! Cliente email, unique username/email for users, the Logradouro foreign key,
//! and cascading delete of Logradouros when their Cliente goes away.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Cliente, Logradouro, NewCliente, NewLogradouro, NewUser, User};
use super::repository::{
    ClienteRepository, LogradouroRepository, UserRepository, CLIENTE_EMAIL_CONSTRAINT,
    USER_EMAIL_CONSTRAINT, USER_USERNAME_CONSTRAINT,
};

const LOGRADOURO_CLIENTE_FK: &str = "logradouros_cliente_id_fkey";

#[derive(Debug, Clone)]
struct ClienteRecord {
    name: String,
    email: String,
    logo: String,
}

#[derive(Default)]
struct Tables {
    clientes: BTreeMap<i32, ClienteRecord>,
    logradouros: BTreeMap<i32, Logradouro>,
    users: Vec<User>,
    next_cliente_id: i32,
    next_logradouro_id: i32,
}

impl Tables {
    fn materialize(&self, id: i32, record: &ClienteRecord) -> Cliente {
        Cliente {
            id,
            name: record.name.clone(),
            email: record.email.clone(),
            logo: record.logo.clone(),
            logradouros: self
                .logradouros
                .values()
                .filter(|l| l.cliente_id == id)
                .cloned()
                .collect(),
        }
    }

    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.clientes
            .iter()
            .any(|(id, c)| c.email == email && Some(*id) != except)
    }
}

/// Shared handle; clones see the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClienteRepository for MemoryStore {
    async fn get_by_id(&self, id: i32) -> Result<Option<Cliente>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.clientes.get(&id).map(|c| tables.materialize(id, c)))
    }

    async fn get_all(&self) -> Result<Vec<Cliente>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .clientes
            .iter()
            .map(|(id, c)| tables.materialize(*id, c))
            .collect())
    }

    async fn add(&self, cliente: &NewCliente) -> Result<Cliente, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&cliente.email, None) {
            return Err(DatabaseError::UniqueViolation(CLIENTE_EMAIL_CONSTRAINT.to_string()));
        }

        tables.next_cliente_id += 1;
        let id = tables.next_cliente_id;
        let record = ClienteRecord {
            name: cliente.name.clone(),
            email: cliente.email.clone(),
            logo: cliente.logo.clone(),
        };
        let created = tables.materialize(id, &record);
        tables.clientes.insert(id, record);
        Ok(created)
    }

    async fn update(&self, id: i32, cliente: &NewCliente) -> Result<Option<Cliente>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.clientes.contains_key(&id) {
            return Ok(None);
        }
        if tables.email_taken(&cliente.email, Some(id)) {
            return Err(DatabaseError::UniqueViolation(CLIENTE_EMAIL_CONSTRAINT.to_string()));
        }

        let record = ClienteRecord {
            name: cliente.name.clone(),
            email: cliente.email.clone(),
            logo: cliente.logo.clone(),
        };
        let updated = tables.materialize(id, &record);
        tables.clientes.insert(id, record);
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.clientes.remove(&id).is_none() {
            return Ok(false);
        }
        tables.logradouros.retain(|_, l| l.cliente_id != id);
        Ok(true)
    }
}

#[async_trait]
impl LogradouroRepository for MemoryStore {
    async fn get_by_id(&self, id: i32) -> Result<Option<Logradouro>, DatabaseError> {
        Ok(self.tables.read().await.logradouros.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Logradouro>, DatabaseError> {
        Ok(self.tables.read().await.logradouros.values().cloned().collect())
    }

    async fn add(&self, logradouro: &NewLogradouro) -> Result<Logradouro, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.clientes.contains_key(&logradouro.cliente_id) {
            return Err(DatabaseError::ForeignKeyViolation(LOGRADOURO_CLIENTE_FK.to_string()));
        }

        tables.next_logradouro_id += 1;
        let created = Logradouro {
            id: tables.next_logradouro_id,
            street: logradouro.street.clone(),
            cliente_id: logradouro.cliente_id,
        };
        tables.logradouros.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        logradouro: &NewLogradouro,
    ) -> Result<Option<Logradouro>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.logradouros.contains_key(&id) {
            return Ok(None);
        }
        if !tables.clientes.contains_key(&logradouro.cliente_id) {
            return Err(DatabaseError::ForeignKeyViolation(LOGRADOURO_CLIENTE_FK.to_string()));
        }

        let updated = Logradouro {
            id,
            street: logradouro.street.clone(),
            cliente_id: logradouro.cliente_id,
        };
        tables.logradouros.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.logradouros.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username.eq_ignore_ascii_case(&user.username)) {
            return Err(DatabaseError::UniqueViolation(USER_USERNAME_CONSTRAINT.to_string()));
        }
        if tables.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(DatabaseError::UniqueViolation(USER_EMAIL_CONSTRAINT.to_string()));
        }

        let created = User {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            roles: Vec::new(),
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_cliente(email: &str) -> NewCliente {
        NewCliente {
            name: "Acme".to_string(),
            email: email.to_string(),
            logo: "https://cdn.test/acme.png".to_string(),
        }
    }

    #[tokio::test]
    async fn assigns_increasing_ids() {
        let store = MemoryStore::new();
        let a = ClienteRepository::add(&store, &new_cliente("a@acme.test")).await.unwrap();
        let b = ClienteRepository::add(&store, &new_cliente("b@acme.test")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn duplicate_cliente_email_is_unique_violation() {
        let store = MemoryStore::new();
        ClienteRepository::add(&store, &new_cliente("a@acme.test")).await.unwrap();
        let err = ClienteRepository::add(&store, &new_cliente("a@acme.test")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(c) if c == CLIENTE_EMAIL_CONSTRAINT));
        assert_eq!(ClienteRepository::get_all(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_may_keep_own_email_but_not_take_another() {
        let store = MemoryStore::new();
        let a = ClienteRepository::add(&store, &new_cliente("a@acme.test")).await.unwrap();
        ClienteRepository::add(&store, &new_cliente("b@acme.test")).await.unwrap();

        let same = ClienteRepository::update(&store, a.id, &new_cliente("a@acme.test")).await.unwrap();
        assert!(same.is_some());

        let err = ClienteRepository::update(&store, a.id, &new_cliente("b@acme.test")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn update_missing_returns_none() {
        let store = MemoryStore::new();
        let missing = ClienteRepository::update(&store, 99, &new_cliente("x@acme.test")).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn logradouro_requires_existing_cliente() {
        let store = MemoryStore::new();
        let err = LogradouroRepository::add(
            &store,
            &NewLogradouro { street: "Rua A".to_string(), cliente_id: 7 },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DatabaseError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn deleting_cliente_cascades() {
        let store = MemoryStore::new();
        let cliente = ClienteRepository::add(&store, &new_cliente("a@acme.test")).await.unwrap();
        let rua = LogradouroRepository::add(
            &store,
            &NewLogradouro { street: "Rua A".to_string(), cliente_id: cliente.id },
        )
        .await
        .unwrap();

        let loaded = ClienteRepository::get_by_id(&store, cliente.id).await.unwrap().unwrap();
        assert_eq!(loaded.logradouros, vec![rua.clone()]);

        assert!(ClienteRepository::delete(&store, cliente.id).await.unwrap());
        assert!(LogradouroRepository::get_by_id(&store, rua.id).await.unwrap().is_none());
        assert!(!ClienteRepository::delete(&store, cliente.id).await.unwrap());
    }

    #[tokio::test]
    async fn user_uniqueness_is_case_insensitive() {
        let store = MemoryStore::new();
        let user = NewUser {
            username: "thomas".to_string(),
            email: "thomas@acme.test".to_string(),
            password_hash: "hash".to_string(),
        };
        store.create(&user).await.unwrap();

        let err = store
            .create(&NewUser { username: "THOMAS".to_string(), email: "other@acme.test".to_string(), ..user.clone() })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(c) if c == USER_USERNAME_CONSTRAINT));

        let found = store.find_by_email("Thomas@Acme.test").await.unwrap();
        assert!(found.is_some());
    }
}
