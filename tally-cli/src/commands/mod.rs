//! CLI command implementations

pub mod login;
pub mod logs;
pub mod statement;
pub mod user;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tally_core::config::Config;
use tally_core::{EntryPoint, LogEvent, LoggingService, TallyContext};

/// Get the logging service for CLI operations
///
/// Returns None when event logging is disabled or fails to initialize
/// (logging should never block operations)
pub fn get_logger() -> Option<LoggingService> {
    let tally_dir = get_tally_dir().ok()?;
    std::fs::create_dir_all(&tally_dir).ok()?;

    let config = Config::load(&tally_dir).unwrap_or_default();
    if !config.event_logging {
        return None;
    }

    LoggingService::new(&tally_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
        .map_err(|e| tracing::debug!(error = %e, "event logging unavailable"))
        .ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        if let Err(e) = l.log(event) {
            tracing::debug!(error = %e, "failed to record event");
        }
    }
}

/// Record the outcome of a command
///
/// Only the error kind is stored; messages can carry emails and amounts.
pub fn log_outcome<T>(
    logger: &Option<LoggingService>,
    command: &str,
    result: &tally_core::domain::result::Result<T>,
) {
    let event = match result {
        Ok(_) => LogEvent::new("command_executed").with_command(command),
        Err(e) => LogEvent::new("command_failed")
            .with_command(command)
            .with_error(e.kind())
            .with_error_details(format!("status {}", e.status_code())),
    };
    log_event(logger, event);
}

/// Get the tally directory from environment or default
pub fn get_tally_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TALLY_DIR") {
        return Ok(PathBuf::from(dir));
    }

    dirs::home_dir()
        .map(|home| home.join(".tally"))
        .context("Could not find home directory; set TALLY_DIR")
}

/// Open the ledger in the tally directory, creating it if needed
pub fn get_context() -> Result<TallyContext> {
    let tally_dir = get_tally_dir()?;

    std::fs::create_dir_all(&tally_dir)
        .with_context(|| format!("Failed to create tally directory: {:?}", tally_dir))?;

    TallyContext::new(&tally_dir).context("Failed to initialize tally context")
}

