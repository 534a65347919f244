//! Repository ports - storage abstraction for users and statements

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{NewUser, Statement, User, UserBalance};

/// User store
///
/// Holds user identity records. The statement use cases only read from it.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Find a user by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Find a user by (normalized) email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Register a new user
    ///
    /// Fails with `Error::UserAlreadyExists` when the email is taken.
    async fn create(&self, data: NewUser) -> Result<User>;
}

/// Statement store
///
/// Append-only ledger of deposit/withdrawal records, ordered per user by
/// insertion. Balances are always derived from the stored sequence.
#[async_trait]
pub trait StatementsRepository: Send + Sync {
    /// Append a statement and return the stored record
    async fn create(&self, statement: &Statement) -> Result<Statement>;

    /// Find a statement by id, scoped to its owning user
    async fn find_statement_operation(
        &self,
        user_id: Uuid,
        statement_id: Uuid,
    ) -> Result<Option<Statement>>;

    /// Compute the user's balance, optionally returning the full ordered sequence
    async fn get_user_balance(&self, user_id: Uuid, with_statement: bool) -> Result<UserBalance>;
}
