//! Tally Core - Business logic for a personal finance ledger
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, Statement, balances)
//! - **ports**: Trait definitions for external dependencies (repositories, password hashing)
//! - **services**: Use case orchestration
//! - **adapters**: Concrete implementations (DuckDB, in-memory, Argon2)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbRepository;
use adapters::memory::{InMemoryStatementsRepository, InMemoryUsersRepository};
use adapters::password::Argon2PasswordHasher;
use config::Config;
use ports::{PasswordHasher, StatementsRepository, UsersRepository};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{BalanceView, OperationType, Statement, User, UserProfile};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for Tally operations
///
/// Holds configuration and every use case service, all wired to the same
/// user and statement stores.
pub struct TallyContext {
    pub config: Config,
    pub create_user: CreateUserService,
    pub authenticate_user: AuthenticateUserService,
    pub show_user_profile: ShowUserProfileService,
    pub create_statement: CreateStatementService,
    pub get_balance: GetBalanceService,
    pub get_statement_operation: GetStatementOperationService,
}

impl TallyContext {
    /// Open the persistent ledger (`tally.duckdb`) in the tally directory
    pub fn new(tally_dir: &Path) -> Result<Self> {
        let config = Config::load(tally_dir)?;

        let db_path = tally_dir.join("tally.duckdb");
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);

        // Initialize schema
        repository.ensure_schema()?;

        let hasher = Arc::new(Argon2PasswordHasher::new(config.argon2));
        Ok(Self::with_repositories(
            config,
            repository.clone(),
            repository,
            hasher,
        ))
    }

    /// Volatile ledger for tests and demos
    pub fn in_memory(config: Config) -> Self {
        let hasher = Arc::new(Argon2PasswordHasher::new(config.argon2));
        Self::with_repositories(
            config,
            Arc::new(InMemoryUsersRepository::new()),
            Arc::new(InMemoryStatementsRepository::new()),
            hasher,
        )
    }

    /// Wire services over arbitrary store implementations
    pub fn with_repositories(
        config: Config,
        users: Arc<dyn UsersRepository>,
        statements: Arc<dyn StatementsRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        let create_user =
            CreateUserService::new(Arc::clone(&users), Arc::clone(&hasher), config.min_password_length);
        let authenticate_user = AuthenticateUserService::new(Arc::clone(&users), hasher);
        let show_user_profile = ShowUserProfileService::new(Arc::clone(&users));
        let create_statement = CreateStatementService::new(Arc::clone(&users), Arc::clone(&statements));
        let get_balance = GetBalanceService::new(Arc::clone(&users), Arc::clone(&statements));
        let get_statement_operation = GetStatementOperationService::new(users, statements);

        Self {
            config,
            create_user,
            authenticate_user,
            show_user_profile,
            create_statement,
            get_balance,
            get_statement_operation,
        }
    }
}
