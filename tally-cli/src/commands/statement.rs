//! Statement commands - deposit, withdraw, balance and single statement lookup

use std::str::FromStr;

use anyhow::{anyhow, Result};
use colored::Colorize;
use rust_decimal::Decimal;
use tally_core::services::{CreateStatementInput, GetBalanceInput, GetStatementOperationInput};
use tally_core::{OperationType, Statement};

use super::{get_context, get_logger, log_outcome};
use crate::output::{self, format_amount, print_result, statements_table};

fn parse_amount(amount: &str) -> Result<Decimal> {
    Decimal::from_str(amount.trim())
        .map_err(|_| anyhow!("Invalid amount: {:?}. Use a number like 12.50", amount))
}

pub async fn run_create(
    operation_type: OperationType,
    user_id: String,
    amount: &str,
    description: String,
    json: bool,
) -> Result<()> {
    let amount = parse_amount(amount)?;
    let ctx = get_context()?;
    let logger = get_logger();

    let result = ctx
        .create_statement
        .execute(CreateStatementInput {
            user_id,
            operation_type,
            description,
            amount,
        })
        .await;
    log_outcome(&logger, operation_type.as_str(), &result);

    if json {
        return print_result(result);
    }

    let statement = result?;
    output::success(&format!(
        "{} of {} recorded",
        match operation_type {
            OperationType::Deposit => "Deposit",
            OperationType::Withdraw => "Withdrawal",
        },
        format_amount(statement.amount)
    ));
    print_statement(&statement);
    Ok(())
}

pub async fn run_balance(user_id: String, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let result = ctx.get_balance.execute(GetBalanceInput { user_id }).await;
    log_outcome(&logger, "balance", &result);

    if json {
        return print_result(result);
    }

    let view = result?;
    if view.statement.is_empty() {
        println!("No statements yet.");
    } else {
        println!("{}", statements_table(&view.statement));
    }
    println!();
    println!("{} {}", "Balance:".bold(), format_amount(view.balance).bold());
    Ok(())
}

pub async fn run_show(user_id: String, statement_id: String, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let result = ctx
        .get_statement_operation
        .execute(GetStatementOperationInput {
            user_id,
            statement_id,
        })
        .await;
    log_outcome(&logger, "statement", &result);

    if json {
        return print_result(result);
    }

    print_statement(&result?);
    Ok(())
}

fn print_statement(statement: &Statement) {
    println!("  Statement ID: {}", statement.id);
    println!("  User: {}", statement.user_id);
    println!("  Type: {}", statement.operation_type);
    println!("  Description: {}", statement.description);
    println!("  Amount: {}", format_amount(statement.amount));
    println!("  Time: {}", statement.created_at.to_rfc3339());
}
