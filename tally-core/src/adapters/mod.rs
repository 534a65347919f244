//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for both repository ports (persistent store)
//! - `tokio` locked hash maps for both repository ports (in-memory store)
//! - Argon2id for the PasswordHasher port

pub mod duckdb;
pub mod memory;
pub mod password;
