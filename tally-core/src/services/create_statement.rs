//! Create statement service - deposits and withdrawals

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{add_to_balance, OperationType, Statement};
use crate::ports::{StatementsRepository, UsersRepository};

use super::lookup::require_user;

/// Input for [`CreateStatementService::execute`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStatementInput {
    pub user_id: String,
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub description: String,
    pub amount: Decimal,
}

/// Per-user write locks
///
/// One entry per user that has ever written a statement in this process.
#[derive(Default)]
struct UserLocks {
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl UserLocks {
    fn lock_for(&self, user_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(user_id).or_default())
    }
}

/// Appends deposit/withdrawal statements to a user's ledger
pub struct CreateStatementService {
    users: Arc<dyn UsersRepository>,
    statements: Arc<dyn StatementsRepository>,
    locks: UserLocks,
}

impl CreateStatementService {
    pub fn new(users: Arc<dyn UsersRepository>, statements: Arc<dyn StatementsRepository>) -> Self {
        Self {
            users,
            statements,
            locks: UserLocks::default(),
        }
    }

    /// Create a statement
    ///
    /// Fails with `UserNotFound` for unknown users, `InsufficientFunds` when
    /// a withdrawal exceeds the current balance, and `Validation` when a
    /// deposit would push the balance past the representable range.
    /// Writes for the same user are serialized so the balance check and the
    /// append cannot interleave with another write.
    pub async fn execute(&self, input: CreateStatementInput) -> Result<Statement> {
        let user = require_user(self.users.as_ref(), &input.user_id).await?;

        let statement = Statement::new(
            user.id,
            input.operation_type,
            input.description.trim(),
            input.amount,
        );
        statement.validate().map_err(Error::validation)?;

        let lock = self.locks.lock_for(user.id);
        let _guard = lock.lock().await;

        let available = self
            .statements
            .get_user_balance(user.id, false)
            .await?
            .balance;

        match statement.operation_type {
            OperationType::Deposit => {
                add_to_balance(available, statement.amount)?;
            }
            OperationType::Withdraw => {
                if statement.amount > available {
                    tracing::debug!(user_id = %user.id, "withdrawal rejected: insufficient funds");
                    return Err(Error::InsufficientFunds {
                        requested: statement.amount,
                        available,
                    });
                }
            }
        }

        let created = self.statements.create(&statement).await?;

        tracing::info!(
            user_id = %created.user_id,
            statement_id = %created.id,
            operation = %created.operation_type,
            "statement created"
        );
        Ok(created)
    }
}
