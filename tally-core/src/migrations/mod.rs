//! Ledger schema migrations
//!
//! SQL files are embedded with `include_str!` and applied by
//! [`MigrationService`](crate::services::MigrationService) in list order.
//! `000_migrations.sql` must stay first: it creates the tracking table.

/// (file name, sql) pairs for `tally.duckdb`
pub const MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_initial_schema.sql", include_str!("001_initial_schema.sql")),
];
