//! Get balance service

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::BalanceView;
use crate::ports::{StatementsRepository, UsersRepository};

use super::lookup::require_user;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBalanceInput {
    pub user_id: String,
}

/// Reports a user's full statement history and current balance
pub struct GetBalanceService {
    users: Arc<dyn UsersRepository>,
    statements: Arc<dyn StatementsRepository>,
}

impl GetBalanceService {
    pub fn new(users: Arc<dyn UsersRepository>, statements: Arc<dyn StatementsRepository>) -> Self {
        Self { users, statements }
    }

    /// Statements come back in creation order; the balance is their signed sum
    pub async fn execute(&self, input: GetBalanceInput) -> Result<BalanceView> {
        let user = require_user(self.users.as_ref(), &input.user_id).await?;

        let balance = self.statements.get_user_balance(user.id, true).await?;
        tracing::debug!(user_id = %user.id, "balance read");

        Ok(balance.into())
    }
}
