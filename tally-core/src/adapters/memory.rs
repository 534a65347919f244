//! In-memory repository implementations
//!
//! Used by tests and by `TallyContext::in_memory`. Both stores guard their
//! maps with a `tokio::sync::RwLock` so they can be shared through `Arc`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{NewUser, Statement, User, UserBalance};
use crate::ports::{StatementsRepository, UsersRepository};

/// In-memory user store keyed by user id
#[derive(Debug, Default)]
pub struct InMemoryUsersRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = User::normalize_email(email);
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, data: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        let email = User::normalize_email(&data.email);
        if users.values().any(|u| u.email == email) {
            return Err(Error::UserAlreadyExists(email));
        }

        let user = User::new(NewUser { email, ..data });
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

/// In-memory statement store: per-user statement sequences, append only
#[derive(Debug, Default)]
pub struct InMemoryStatementsRepository {
    statements: RwLock<HashMap<Uuid, Vec<Statement>>>,
}

impl InMemoryStatementsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatementsRepository for InMemoryStatementsRepository {
    async fn create(&self, statement: &Statement) -> Result<Statement> {
        self.statements
            .write()
            .await
            .entry(statement.user_id)
            .or_default()
            .push(statement.clone());
        Ok(statement.clone())
    }

    async fn find_statement_operation(
        &self,
        user_id: Uuid,
        statement_id: Uuid,
    ) -> Result<Option<Statement>> {
        Ok(self
            .statements
            .read()
            .await
            .get(&user_id)
            .and_then(|list| list.iter().find(|s| s.id == statement_id))
            .cloned())
    }

    async fn get_user_balance(&self, user_id: Uuid, with_statement: bool) -> Result<UserBalance> {
        let statements = self
            .statements
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default();
        UserBalance::from_statements(statements, with_statement)
    }
}
