//! Output formatting utilities

use std::fmt;

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::Decimal;
use serde::Serialize;
use tally_core::{OperationResult, Statement};

/// Marker error for failures already written to stdout as JSON
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("operation failed")
    }
}

impl std::error::Error for Reported {}

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a core result wrapped in an `OperationResult` envelope
///
/// Failures are still returned as errors so the process exits non-zero.
pub fn print_result<T: Serialize>(result: tally_core::domain::result::Result<T>) -> Result<()> {
    let failed = result.is_err();
    let envelope = OperationResult::from(result);
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    if failed {
        return Err(Reported.into());
    }
    Ok(())
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Money with at least two decimals; sub-cent digits are kept, never rounded
///
/// The sign is the caller's: pass `Statement::signed_amount` to show
/// withdrawals negative.
pub fn format_amount(amount: Decimal) -> String {
    let mut amount = amount.normalize();
    if amount.scale() < 2 {
        amount.rescale(2);
    }
    amount.to_string()
}

pub fn statements_table(statements: &[Statement]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["ID", "Date", "Type", "Description", "Amount"]);

    for s in statements {
        let amount = format_amount(s.signed_amount());
        let amount = if s.signed_amount().is_sign_negative() {
            amount.red().to_string()
        } else {
            amount.green().to_string()
        };

        table.add_row(vec![
            s.id.to_string(),
            s.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            s.operation_type.to_string(),
            s.description.clone(),
            amount,
        ]);
    }
    table
}
