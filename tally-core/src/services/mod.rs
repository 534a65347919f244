//! Service layer - use case orchestration
//!
//! Each service implements one use case against the port traits and is
//! shared by every front end through [`TallyContext`](crate::TallyContext).

mod authenticate_user;
mod create_statement;
mod create_user;
mod get_balance;
mod get_statement_operation;
pub mod logging;
mod lookup;
pub mod migration;
mod show_user_profile;

#[cfg(test)]
mod test_support;

pub use authenticate_user::{AuthenticateUserInput, AuthenticateUserService};
pub use create_statement::{CreateStatementInput, CreateStatementService};
pub use create_user::{CreateUserInput, CreateUserService};
pub use get_balance::{GetBalanceInput, GetBalanceService};
pub use get_statement_operation::{GetStatementOperationInput, GetStatementOperationService};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use show_user_profile::ShowUserProfileService;
