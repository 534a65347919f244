//! Statement domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Most decimal places an amount may carry
pub const MAX_AMOUNT_SCALE: u32 = 10;

/// Amounts must stay below 10^28 so 28 integer digits plus the scale fit
/// `DECIMAL(38, 10)`
fn amount_limit() -> Decimal {
    Decimal::from_i128_with_scale(10_i128.pow(28), 0)
}

/// Kind of statement operation, which decides the sign it contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Deposit,
    Withdraw,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Deposit => "deposit",
            OperationType::Withdraw => "withdraw",
        }
    }

    /// Apply this operation's sign to an amount
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            OperationType::Deposit => amount,
            OperationType::Withdraw => -amount,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(OperationType::Deposit),
            "withdraw" | "withdrawal" => Ok(OperationType::Withdraw),
            other => Err(format!("unknown operation type: {}", other)),
        }
    }
}

/// One immutable deposit or withdrawal record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub description: String,
    /// Always positive; the sign comes from `operation_type`
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Statement {
    /// Create a new statement with a fresh id and timestamps set to now
    pub fn new(
        user_id: Uuid,
        operation_type: OperationType,
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            operation_type,
            description: description.into(),
            amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// Contribution of this statement to the running balance
    pub fn signed_amount(&self) -> Decimal {
        self.operation_type.signed(self.amount)
    }

    /// Validate statement data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.amount <= Decimal::ZERO {
            return Err("amount must be greater than zero");
        }
        if self.amount.normalize().scale() > MAX_AMOUNT_SCALE {
            return Err("amount cannot have more than 10 decimal places");
        }
        if self.amount >= amount_limit() {
            return Err("amount is too large");
        }
        if self.description.trim().is_empty() {
            return Err("description cannot be empty");
        }
        Ok(())
    }
}
