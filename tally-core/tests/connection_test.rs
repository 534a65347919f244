//! DuckDB connection lifecycle tests
//!
//! Run with: cargo test --test connection_test -- --nocapture

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tempfile::TempDir;

use tally_core::adapters::duckdb::DuckDbRepository;
use tally_core::domain::NewUser;
use tally_core::{OperationType, Statement};

/// Opening the same file repeatedly re-runs no migrations and keeps data
#[test]
fn test_sequential_connections() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("tally.duckdb");

    let user = {
        let repo = DuckDbRepository::new(&db_path).unwrap();
        let result = repo.run_migrations().unwrap();
        assert!(!result.applied.is_empty());

        let user = repo
            .insert_user(NewUser {
                name: "valid_name".to_string(),
                email: "a@mail.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .unwrap();
        repo.insert_statement(&Statement::new(
            user.id,
            OperationType::Deposit,
            "salary",
            Decimal::new(1050, 2),
        ))
        .unwrap();
        user
    };

    for i in 0..5 {
        let start = Instant::now();
        let repo = DuckDbRepository::new(&db_path).unwrap();
        let result = repo.run_migrations().unwrap();
        println!("Connection {}: opened in {:?}", i, start.elapsed());

        assert!(result.applied.is_empty());
        assert_eq!(repo.get_user_count().unwrap(), 1);

        let statements = repo.get_statements_by_user(&user.id).unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].amount, Decimal::new(1050, 2));
        assert!(statements[0].created_at <= Utc::now());
    }
}

/// The parent directory must exist; a missing one is a plain error, not a retry loop
#[test]
fn test_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("missing").join("tally.duckdb");

    let start = Instant::now();
    assert!(DuckDbRepository::new(&db_path).is_err());
    println!("Failed after {:?}", start.elapsed());
}
