//! Get statement operation service

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::Statement;
use crate::ports::{StatementsRepository, UsersRepository};

use super::lookup::require_user;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetStatementOperationInput {
    pub user_id: String,
    pub statement_id: String,
}

/// Fetches a single statement owned by a user
pub struct GetStatementOperationService {
    users: Arc<dyn UsersRepository>,
    statements: Arc<dyn StatementsRepository>,
}

impl GetStatementOperationService {
    pub fn new(users: Arc<dyn UsersRepository>, statements: Arc<dyn StatementsRepository>) -> Self {
        Self { users, statements }
    }

    /// A statement that exists but belongs to another user is reported
    /// as `StatementNotFound`, same as one that doesn't exist.
    pub async fn execute(&self, input: GetStatementOperationInput) -> Result<Statement> {
        let user = require_user(self.users.as_ref(), &input.user_id).await?;

        let not_found = || Error::StatementNotFound(input.statement_id.clone());
        let statement_id = Uuid::parse_str(input.statement_id.trim()).map_err(|_| not_found())?;

        self.statements
            .find_statement_operation(user.id, statement_id)
            .await?
            .ok_or_else(not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OperationType;
    use crate::services::test_support::{fixture, seed_user};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_returns_owned_statement() {
        let f = fixture();
        let user = seed_user(&f.users, "a@mail.com").await;
        let statement = Statement::new(user.id, OperationType::Deposit, "salary", Decimal::TEN);
        f.statements.create(&statement).await.unwrap();

        let service = GetStatementOperationService::new(f.users.clone(), f.statements.clone());
        let found = service
            .execute(GetStatementOperationInput {
                user_id: user.id.to_string(),
                statement_id: statement.id.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(found, statement);
    }

    #[tokio::test]
    async fn test_missing_user_fails() {
        let f = fixture();
        let service = GetStatementOperationService::new(f.users.clone(), f.statements.clone());

        let err = service
            .execute(GetStatementOperationInput {
                user_id: "missing_user".to_string(),
                statement_id: Uuid::new_v4().to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_statement_fails() {
        let f = fixture();
        let user = seed_user(&f.users, "a@mail.com").await;
        let service = GetStatementOperationService::new(f.users.clone(), f.statements.clone());

        for statement_id in ["invalid_statement".to_string(), Uuid::new_v4().to_string()] {
            let err = service
                .execute(GetStatementOperationInput {
                    user_id: user.id.to_string(),
                    statement_id: statement_id.clone(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, Error::StatementNotFound(id) if id == statement_id));
        }
    }

    #[tokio::test]
    async fn test_other_users_statement_is_not_found() {
        let f = fixture();
        let alice = seed_user(&f.users, "alice@mail.com").await;
        let bob = seed_user(&f.users, "bob@mail.com").await;
        let statement = Statement::new(bob.id, OperationType::Deposit, "gift", Decimal::TEN);
        f.statements.create(&statement).await.unwrap();

        let service = GetStatementOperationService::new(f.users.clone(), f.statements.clone());
        let err = service
            .execute(GetStatementOperationInput {
                user_id: alice.id.to_string(),
                statement_id: statement.id.to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::StatementNotFound(_)));
    }
}
