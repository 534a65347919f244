//! Configuration management
//!
//! Settings live in `settings.json` inside the tally directory:
//! ```json
//! {
//!   "app": { "eventLogging": true, ... },
//!   "security": { "minPasswordLength": 6, "argon2": { "timeCost": 2, ... } }
//! }
//! ```
//! Every field is optional and unknown fields are ignored, so a partial file
//! only overrides what it names.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Default Argon2id parameters for password hashing
pub const DEFAULT_TIME_COST: u32 = 2;
pub const DEFAULT_MEMORY_COST: u32 = 19456; // 19 MiB
pub const DEFAULT_PARALLELISM: u32 = 1;
pub const DEFAULT_HASH_LEN: u32 = 32;

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Raw settings.json structure
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    security: SecuritySettings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default = "default_true")]
    event_logging: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            event_logging: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecuritySettings {
    #[serde(default = "default_min_password_length")]
    min_password_length: usize,
    #[serde(default)]
    argon2: Argon2Params,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            argon2: Argon2Params::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_password_length() -> usize {
    DEFAULT_MIN_PASSWORD_LENGTH
}

/// Argon2id cost parameters
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Argon2Params {
    pub time_cost: u32,
    /// Memory cost in KiB
    pub memory_cost: u32,
    pub parallelism: u32,
    pub hash_len: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
            memory_cost: DEFAULT_MEMORY_COST,
            parallelism: DEFAULT_PARALLELISM,
            hash_len: DEFAULT_HASH_LEN,
        }
    }
}

/// Tally configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// Record product events to logs.duckdb
    pub event_logging: bool,
    pub min_password_length: usize,
    pub argon2: Argon2Params,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            event_logging: true,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            argon2: Argon2Params::default(),
        }
    }
}

impl Config {
    /// Load config from the tally directory
    ///
    /// Environment overrides (for CI/testing):
    /// - `TALLY_EVENT_LOGGING`: true/false
    /// - `TALLY_MIN_PASSWORD_LENGTH`: integer
    pub fn load(tally_dir: &Path) -> Result<Self> {
        let settings_path = tally_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %settings_path.display(), error = %e, "ignoring unreadable settings file");
                SettingsFile::default()
            })
        } else {
            SettingsFile::default()
        };

        let event_logging = parse_bool_env("TALLY_EVENT_LOGGING").unwrap_or(raw.app.event_logging);

        let min_password_length = match std::env::var("TALLY_MIN_PASSWORD_LENGTH") {
            Ok(value) => value.trim().parse().map_err(|_| {
                anyhow::anyhow!("TALLY_MIN_PASSWORD_LENGTH must be a number, got {:?}", value)
            })?,
            Err(_) => raw.security.min_password_length,
        };

        Ok(Self {
            event_logging,
            min_password_length,
            argon2: raw.security.argon2,
        })
    }
}

fn parse_bool_env(name: &str) -> Option<bool> {
    match std::env::var(name).ok().as_deref() {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}
