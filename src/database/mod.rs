//! Database-backed issue store.
//!
//! [`SeaOrmIssueStore`] counts issues with grouped SQL queries and reports
//! connection pool occupancy for the PostgreSQL and SQLite backends.

pub mod config;
pub mod sea_orm_store;

pub use config::{DatabaseConfig, redact_database_url};
pub use sea_orm_store::SeaOrmIssueStore;
pub use sea_orm;
