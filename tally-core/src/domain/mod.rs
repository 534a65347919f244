//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

pub mod balance;
pub mod result;
mod statement;
mod user;

pub use balance::{add_to_balance, compute_balance, BalanceView, UserBalance};
pub use statement::{OperationType, Statement, MAX_AMOUNT_SCALE};
pub use user::{NewUser, User, UserProfile};
