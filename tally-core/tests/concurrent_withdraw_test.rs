//! Concurrent withdrawal tests
//!
//! Many tasks withdraw from the same account at once. The balance must
//! never go negative and exactly as many withdrawals as the balance covers
//! may succeed.
//!
//! Run with: cargo test --test concurrent_withdraw_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rust_decimal::Decimal;
use tempfile::TempDir;

use tally_core::adapters::duckdb::DuckDbRepository;
use tally_core::adapters::password::Argon2PasswordHasher;
use tally_core::config::Config;
use tally_core::services::{CreateStatementInput, CreateUserInput, GetBalanceInput};
use tally_core::{Error, OperationType, TallyContext};

/// Number of concurrent withdrawal tasks
const TASK_COUNT: usize = 24;

/// Units deposited up front; each task withdraws one
const STARTING_BALANCE: i64 = 10;

async fn run_concurrent_withdrawals(ctx: Arc<TallyContext>) {
    let user = ctx
        .create_user
        .execute(CreateUserInput {
            name: "valid_name".to_string(),
            email: "a@mail.com".to_string(),
            password: "valid_password".to_string(),
        })
        .await
        .unwrap();

    ctx.create_statement
        .execute(CreateStatementInput {
            user_id: user.id.to_string(),
            operation_type: OperationType::Deposit,
            description: "salary".to_string(),
            amount: Decimal::new(STARTING_BALANCE, 0),
        })
        .await
        .unwrap();

    let success_count = Arc::new(AtomicUsize::new(0));
    let rejected_count = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    let mut handles = vec![];
    for task_id in 0..TASK_COUNT {
        let ctx = Arc::clone(&ctx);
        let user_id = user.id.to_string();
        let success_count = Arc::clone(&success_count);
        let rejected_count = Arc::clone(&rejected_count);

        handles.push(tokio::spawn(async move {
            let result = ctx
                .create_statement
                .execute(CreateStatementInput {
                    user_id,
                    operation_type: OperationType::Withdraw,
                    description: format!("withdrawal {}", task_id),
                    amount: Decimal::ONE,
                })
                .await;

            match result {
                Ok(_) => {
                    success_count.fetch_add(1, Ordering::SeqCst);
                }
                Err(Error::InsufficientFunds { .. }) => {
                    rejected_count.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => panic!("Task {}: unexpected error: {}", task_id, e),
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let successes = success_count.load(Ordering::SeqCst);
    let rejected = rejected_count.load(Ordering::SeqCst);
    println!(
        "{} withdrawals: {} succeeded, {} rejected in {:?}",
        TASK_COUNT,
        successes,
        rejected,
        start.elapsed()
    );

    let view = ctx
        .get_balance
        .execute(GetBalanceInput {
            user_id: user.id.to_string(),
        })
        .await
        .unwrap();

    assert_eq!(successes, STARTING_BALANCE as usize);
    assert_eq!(rejected, TASK_COUNT - STARTING_BALANCE as usize);
    assert_eq!(view.balance, Decimal::ZERO);
    assert_eq!(view.statement.len(), 1 + STARTING_BALANCE as usize);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_withdrawals_in_memory() {
    let ctx = Arc::new(TallyContext::in_memory(Config::default()));
    run_concurrent_withdrawals(ctx).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_withdrawals_duckdb() {
    let temp_dir = TempDir::new().unwrap();
    let repo = DuckDbRepository::new(&temp_dir.path().join("tally.duckdb")).unwrap();
    repo.ensure_schema().unwrap();
    let repo = Arc::new(repo);

    let config = Config::default();
    let hasher = Arc::new(Argon2PasswordHasher::new(config.argon2));
    let ctx = Arc::new(TallyContext::with_repositories(
        config,
        repo.clone(),
        repo,
        hasher,
    ));

    run_concurrent_withdrawals(ctx).await;
}
