//! Balance views derived from a user's statements

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};
use super::Statement;

/// Net balance of a statement sequence: deposits minus withdrawals
///
/// Fails with `Validation` when the sum leaves the representable range.
pub fn compute_balance<'a>(
    statements: impl IntoIterator<Item = &'a Statement>,
) -> Result<Decimal> {
    statements
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, s| add_to_balance(acc, s.signed_amount()))
}

/// Add a signed amount to a balance without overflowing
pub fn add_to_balance(balance: Decimal, amount: Decimal) -> Result<Decimal> {
    balance
        .checked_add(amount)
        .ok_or_else(|| Error::validation("balance would exceed the supported range"))
}

/// What the statement store answers for a balance request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    pub balance: Decimal,
    /// Present only when the statements were requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement: Option<Vec<Statement>>,
}

/// Statement history plus computed balance, as returned by the balance use case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceView {
    pub statement: Vec<Statement>,
    pub balance: Decimal,
}

impl UserBalance {
    /// Build a balance answer from the full ordered statement sequence
    pub fn from_statements(statements: Vec<Statement>, with_statement: bool) -> Result<Self> {
        let balance = compute_balance(&statements)?;
        Ok(Self {
            balance,
            statement: with_statement.then_some(statements),
        })
    }
}

impl From<UserBalance> for BalanceView {
    fn from(value: UserBalance) -> Self {
        Self {
            statement: value.statement.unwrap_or_default(),
            balance: value.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OperationType;
    use uuid::Uuid;

    #[test]
    fn test_empty_balance_is_zero() {
        assert_eq!(compute_balance(&Vec::<Statement>::new()).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_balance_nets_deposits_and_withdrawals() {
        let user_id = Uuid::new_v4();
        let statements = vec![
            Statement::new(user_id, OperationType::Deposit, "a", Decimal::new(1000, 2)),
            Statement::new(user_id, OperationType::Deposit, "b", Decimal::new(250, 2)),
            Statement::new(user_id, OperationType::Withdraw, "c", Decimal::new(1100, 2)),
        ];

        assert_eq!(compute_balance(&statements).unwrap(), Decimal::new(150, 2));
    }

    #[test]
    fn test_balance_overflow_is_validation_error() {
        let user_id = Uuid::new_v4();
        let statements = vec![
            Statement::new(user_id, OperationType::Deposit, "a", Decimal::MAX),
            Statement::new(user_id, OperationType::Deposit, "b", Decimal::ONE),
        ];

        let err = compute_balance(&statements).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.status_code(), 400);

        let err = UserBalance::from_statements(statements, true).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_add_to_balance() {
        assert_eq!(add_to_balance(Decimal::TEN, Decimal::new(-3, 0)).unwrap(), Decimal::new(7, 0));
        assert!(add_to_balance(Decimal::MIN, Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn test_user_balance_without_statements() {
        let user_id = Uuid::new_v4();
        let statements = vec![Statement::new(user_id, OperationType::Deposit, "a", Decimal::TEN)];

        let balance = UserBalance::from_statements(statements, false).unwrap();
        assert_eq!(balance.balance, Decimal::TEN);
        assert!(balance.statement.is_none());

        let view = BalanceView::from(balance);
        assert!(view.statement.is_empty());
    }
}
