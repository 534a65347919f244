//! Result and error types for the core library

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type
///
/// The first five variants are the typed failures of the use cases. They
/// are terminal for the operation and never retried.
#[derive(Error, Debug)]
pub enum Error {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Statement not found: {0}")]
    StatementNotFound(String),

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Incorrect email or password")]
    IncorrectEmailOrPassword,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable snake_case name of the variant, safe to record in event logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UserNotFound(_) => "user_not_found",
            Error::InsufficientFunds { .. } => "insufficient_funds",
            Error::StatementNotFound(_) => "statement_not_found",
            Error::UserAlreadyExists(_) => "user_already_exists",
            Error::IncorrectEmailOrPassword => "incorrect_email_or_password",
            Error::Validation(_) => "validation",
            Error::Database(_) => "database",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Other(_) => "other",
        }
    }

    /// HTTP-style status a controller would answer with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::UserNotFound(_) | Error::StatementNotFound(_) => 404,
            Error::InsufficientFunds { .. } | Error::Validation(_) => 400,
            Error::UserAlreadyExists(_) => 409,
            Error::IncorrectEmailOrPassword => 401,
            Error::Database(_)
            | Error::Config(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Other(_) => 500,
        }
    }
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result envelope for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            status: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            status: None,
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                let status = e.status_code();
                Self {
                    status: Some(status),
                    ..Self::fail(e.to_string())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_result_ok() {
        let result: OperationResult<i32> = OperationResult::ok(42);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_from_result_carries_status() {
        let err: Result<i32> = Err(Error::UserNotFound("missing_user".into()));
        let result: OperationResult<i32> = err.into();
        assert!(!result.success);
        assert_eq!(result.status, Some(404));
        assert!(result.error.unwrap().contains("missing_user"));
    }

    #[test]
    fn test_status_codes() {
        let insufficient = Error::InsufficientFunds {
            requested: Decimal::new(10, 0),
            available: Decimal::new(5, 0),
        };
        assert_eq!(insufficient.status_code(), 400);
        assert_eq!(Error::StatementNotFound("x".into()).status_code(), 404);
        assert_eq!(Error::UserAlreadyExists("a@b.c".into()).status_code(), 409);
        assert_eq!(Error::IncorrectEmailOrPassword.status_code(), 401);
        assert_eq!(Error::database("boom").status_code(), 500);
    }

    #[test]
    fn test_kind_carries_no_payload() {
        let err = Error::UserNotFound("someone@mail.com".into());
        assert_eq!(err.kind(), "user_not_found");
        assert_eq!(Error::IncorrectEmailOrPassword.kind(), "incorrect_email_or_password");
    }

    #[test]
    fn test_insufficient_funds_message() {
        let err = Error::InsufficientFunds {
            requested: Decimal::new(10, 0),
            available: Decimal::new(5, 0),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: requested 10, available 5"
        );
    }
}
