//! DuckDB repository implementation
//!
//! One connection backs both the user store and the statement store.
//! Timestamps are stored as RFC 3339 strings and amounts as DECIMAL, read
//! back through a VARCHAR cast so no precision is lost on the way.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::{params, Connection, OptionalExt};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{NewUser, OperationType, Statement, User, UserBalance};
use crate::ports::{StatementsRepository, UsersRepository};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const USER_COLUMNS: &str = "user_id, name, email, password_hash, created_at, updated_at";

const STATEMENT_COLUMNS: &str =
    "statement_id, user_id, operation_type, description, amount::VARCHAR, created_at, updated_at";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// DuckDB-backed user and statement store
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Open (or create) the database at `db_path`
    ///
    /// Retries with exponential backoff on file locking errors, which occur
    /// when another process holds the database open.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        tracing::warn!(
                            delay_ms = delay.as_millis() as u64,
                            attempt = attempt + 1,
                            max_retries = MAX_RETRIES,
                            error = %err_msg,
                            "database busy, retrying"
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off; nothing here needs extensions
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    /// Path of the database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.conn()?;
        MigrationService::new(&conn).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        let result = self.run_migrations()?;
        if !result.applied.is_empty() {
            tracing::info!(applied = ?result.applied, "applied database migrations");
        }
        Ok(())
    }

    // === User operations ===

    pub fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM sys_users WHERE user_id = ?", USER_COLUMNS),
                [id.to_string()],
                UserRow::from_row,
            )
            .optional()?;
        row.map(User::try_from).transpose()
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM sys_users WHERE email = ?", USER_COLUMNS),
                [User::normalize_email(email)],
                UserRow::from_row,
            )
            .optional()?;
        row.map(User::try_from).transpose()
    }

    pub fn insert_user(&self, data: NewUser) -> Result<User> {
        let conn = self.conn()?;
        let email = User::normalize_email(&data.email);

        // The connection lock makes this check and the insert one step
        let taken: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sys_users WHERE email = ?",
            [email.as_str()],
            |row| row.get(0),
        )?;
        if taken > 0 {
            return Err(Error::UserAlreadyExists(email));
        }

        let user = User::new(NewUser { email, ..data });
        conn.execute(
            "INSERT INTO sys_users (user_id, name, email, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(user)
    }

    pub fn get_user_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_users", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Statement operations ===

    pub fn insert_statement(&self, statement: &Statement) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sys_statements
                (statement_id, user_id, operation_type, description, amount, created_at, updated_at)
             VALUES (?, ?, ?, ?, CAST(? AS DECIMAL(38, 10)), ?, ?)",
            params![
                statement.id.to_string(),
                statement.user_id.to_string(),
                statement.operation_type.as_str(),
                statement.description,
                statement.amount.to_string(),
                statement.created_at.to_rfc3339(),
                statement.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Statements of one user in insertion order
    pub fn get_statements_by_user(&self, user_id: &Uuid) -> Result<Vec<Statement>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sys_statements WHERE user_id = ? ORDER BY seq",
            STATEMENT_COLUMNS
        ))?;

        let rows = stmt
            .query_map([user_id.to_string()], StatementRow::from_row)?
            .collect::<duckdb::Result<Vec<_>>>()?;

        rows.into_iter().map(Statement::try_from).collect()
    }

    pub fn get_statement(&self, user_id: &Uuid, statement_id: &Uuid) -> Result<Option<Statement>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM sys_statements WHERE statement_id = ? AND user_id = ?",
                    STATEMENT_COLUMNS
                ),
                [statement_id.to_string(), user_id.to_string()],
                StatementRow::from_row,
            )
            .optional()?;
        row.map(Statement::try_from).transpose()
    }

    pub fn get_statement_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM sys_statements", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Check whether a table exists in the current database
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
            [table_name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

// Port methods run the synchronous helpers inline. Each query blocks the
// calling runtime worker while it holds the connection mutex.

#[async_trait]
impl UsersRepository for DuckDbRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.get_user_by_id(&id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email(email)
    }

    async fn create(&self, data: NewUser) -> Result<User> {
        self.insert_user(data)
    }
}

#[async_trait]
impl StatementsRepository for DuckDbRepository {
    async fn create(&self, statement: &Statement) -> Result<Statement> {
        self.insert_statement(statement)?;
        Ok(statement.clone())
    }

    async fn find_statement_operation(
        &self,
        user_id: Uuid,
        statement_id: Uuid,
    ) -> Result<Option<Statement>> {
        self.get_statement(&user_id, &statement_id)
    }

    async fn get_user_balance(&self, user_id: Uuid, with_statement: bool) -> Result<UserBalance> {
        let statements = self.get_statements_by_user(&user_id)?;
        UserBalance::from_statements(statements, with_statement)
    }
}

// Raw rows, converted into domain types outside the duckdb closure so that
// parse failures surface as errors instead of being swallowed.

struct UserRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn from_row(row: &duckdb::Row) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: parse_uuid(&row.id)?,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

struct StatementRow {
    id: String,
    user_id: String,
    operation_type: String,
    description: String,
    amount: String,
    created_at: String,
    updated_at: String,
}

impl StatementRow {
    fn from_row(row: &duckdb::Row) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            operation_type: row.get(2)?,
            description: row.get(3)?,
            amount: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl TryFrom<StatementRow> for Statement {
    type Error = Error;

    fn try_from(row: StatementRow) -> Result<Self> {
        Ok(Statement {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            operation_type: OperationType::from_str(&row.operation_type).map_err(Error::database)?,
            description: row.description,
            amount: parse_decimal(&row.amount)?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

// Helper functions

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| Error::database(format!("Invalid id {:?}: {}", s, e)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::database(format!("Invalid timestamp {:?}: {}", s, e)))
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    // DECIMAL(38, 10) pads ten places; 28 integer digits plus the padding
    // would not fit a Decimal mantissa
    let s = s.trim();
    let digits = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    };
    Decimal::from_str(digits)
        .map(|d| d.normalize())
        .map_err(|e| Error::database(format!("Invalid amount {:?}: {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo(temp_dir: &TempDir) -> DuckDbRepository {
        let repo = DuckDbRepository::new(&temp_dir.path().join("test.duckdb")).unwrap();
        repo.ensure_schema().unwrap();
        repo
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "valid_name".to_string(),
            email: email.to_string(),
            password_hash: "hashed_password".to_string(),
        }
    }

    #[test]
    fn test_schema_created() {
        let temp_dir = TempDir::new().unwrap();
        let repo = create_test_repo(&temp_dir);

        assert!(repo.table_exists("sys_users").unwrap());
        assert!(repo.table_exists("sys_statements").unwrap());
        assert!(repo.table_exists("sys_migrations").unwrap());
    }

    #[test]
    fn test_user_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repo = create_test_repo(&temp_dir);

        let user = repo.insert_user(new_user("Someone@Mail.com")).unwrap();
        assert_eq!(user.email, "someone@mail.com");

        let by_id = repo.get_user_by_id(&user.id).unwrap().unwrap();
        assert_eq!(by_id, user);
        assert_eq!(by_id.password_hash, "hashed_password");

        let by_email = repo.get_user_by_email(" SOMEONE@mail.com").unwrap();
        assert_eq!(by_email, Some(user));
        assert_eq!(repo.get_user_by_id(&Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let repo = create_test_repo(&temp_dir);

        repo.insert_user(new_user("a@mail.com")).unwrap();
        let err = repo.insert_user(new_user("A@mail.com")).unwrap_err();
        assert!(matches!(err, Error::UserAlreadyExists(_)));
        assert_eq!(repo.get_user_count().unwrap(), 1);
    }

    #[test]
    fn test_statement_amount_precision_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let repo = create_test_repo(&temp_dir);
        let user_id = Uuid::new_v4();

        let statement = Statement::new(
            user_id,
            OperationType::Deposit,
            "interest",
            Decimal::from_str("0.1234").unwrap(),
        );
        repo.insert_statement(&statement).unwrap();

        let stored = repo.get_statement(&user_id, &statement.id).unwrap().unwrap();
        assert_eq!(stored, statement);
        assert_eq!(stored.amount.to_string(), "0.1234");
    }

    #[test]
    fn test_largest_amount_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let repo = create_test_repo(&temp_dir);
        let user_id = Uuid::new_v4();

        for amount in ["9999999999999999999999999999", "0.0000000001", "120.5000"] {
            let statement = Statement::new(
                user_id,
                OperationType::Deposit,
                "edge",
                Decimal::from_str(amount).unwrap(),
            );
            repo.insert_statement(&statement).unwrap();
            let stored = repo.get_statement(&user_id, &statement.id).unwrap().unwrap();
            assert_eq!(stored.amount, statement.amount);
        }

        assert_eq!(parse_decimal("120.5000000000").unwrap().to_string(), "120.5");
        assert_eq!(parse_decimal("7.0000000000").unwrap().to_string(), "7");
    }

    #[test]
    fn test_statements_ordered_by_insertion() {
        let temp_dir = TempDir::new().unwrap();
        let repo = create_test_repo(&temp_dir);
        let user_id = Uuid::new_v4();

        let ids: Vec<Uuid> = (1..=5)
            .map(|i| {
                let s = Statement::new(user_id, OperationType::Deposit, format!("d{}", i), Decimal::from(i));
                repo.insert_statement(&s).unwrap();
                s.id
            })
            .collect();

        let stored: Vec<Uuid> = repo
            .get_statements_by_user(&user_id)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(stored, ids);
    }

    #[test]
    fn test_statement_scoped_to_owner() {
        let temp_dir = TempDir::new().unwrap();
        let repo = create_test_repo(&temp_dir);
        let owner = Uuid::new_v4();

        let statement = Statement::new(owner, OperationType::Deposit, "gift", Decimal::TEN);
        repo.insert_statement(&statement).unwrap();

        assert!(repo.get_statement(&owner, &statement.id).unwrap().is_some());
        assert!(repo.get_statement(&Uuid::new_v4(), &statement.id).unwrap().is_none());
    }

    #[test]
    fn test_non_positive_amount_rejected_by_schema() {
        let temp_dir = TempDir::new().unwrap();
        let repo = create_test_repo(&temp_dir);

        let statement = Statement::new(Uuid::new_v4(), OperationType::Deposit, "bad", Decimal::ZERO);
        assert!(repo.insert_statement(&statement).is_err());
        assert_eq!(repo.get_statement_count().unwrap(), 0);
    }

    #[test]
    fn test_data_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let user = {
            let repo = create_test_repo(&temp_dir);
            repo.insert_user(new_user("persist@mail.com")).unwrap()
        };

        let repo = create_test_repo(&temp_dir);
        assert_eq!(repo.get_user_by_id(&user.id).unwrap(), Some(user));
    }

    #[test]
    fn test_retryable_error_detection() {
        assert!(is_retryable_error("IO Error: Could not set lock on file: Resource temporarily unavailable"));
        assert!(is_retryable_error("The process cannot access the file because it is being used by another process"));
        assert!(!is_retryable_error("Catalog Error: Table does not exist"));
    }
}
