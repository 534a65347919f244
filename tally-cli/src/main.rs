//! Tally CLI - a personal ledger in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tally_core::OperationType;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{login, logs, statement, user};

/// Tally - deposits, withdrawals and balances in your terminal
#[derive(Parser)]
#[command(name = "tally", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        command: user::UserCommands,
    },

    /// Check an email and password
    Login {
        /// Account email
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Deposit money into a user's ledger
    Deposit {
        /// User ID
        user_id: String,
        /// Amount, e.g. 12.50
        amount: String,
        /// What the money is for
        #[arg(long, short, default_value = "Deposit")]
        description: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Withdraw money from a user's ledger
    Withdraw {
        /// User ID
        user_id: String,
        /// Amount, e.g. 12.50
        amount: String,
        /// What the money is for
        #[arg(long, short, default_value = "Withdraw")]
        description: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a user's statements and balance
    Balance {
        /// User ID
        user_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single statement
    Statement {
        /// User ID
        user_id: String,
        /// Statement ID
        statement_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage event logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let result = tokio::runtime::Runtime::new()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(run(cli)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // JSON output already carries the error
            if e.downcast_ref::<output::Reported>().is_none() {
                output::error(&e.to_string());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::User { command } => user::run(command).await,
        Commands::Login { email, password, json } => login::run(email, password, json).await,
        Commands::Deposit { user_id, amount, description, json } => {
            statement::run_create(OperationType::Deposit, user_id, &amount, description, json).await
        }
        Commands::Withdraw { user_id, amount, description, json } => {
            statement::run_create(OperationType::Withdraw, user_id, &amount, description, json).await
        }
        Commands::Balance { user_id, json } => statement::run_balance(user_id, json).await,
        Commands::Statement { user_id, statement_id, json } => {
            statement::run_show(user_id, statement_id, json).await
        }
        Commands::Logs { command } => logs::run(command),
    }
}
