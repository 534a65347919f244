//! Event log schema migrations for `logs.duckdb`
//!
//! Kept apart from the ledger migrations so the two databases can evolve
//! independently. New files are appended as `NNN_description.sql`.

pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_initial_schema.sql", include_str!("001_initial_schema.sql")),
];
