//! Testing utilities for exporter applications
//!
//! - request scenarios driven through a router without a server
//! - parsing of scrape payloads into queryable series
//! - a SQLite in-memory issues database (with the `database` feature)

#[cfg(feature = "database")]
mod database;
mod scenario;

#[cfg(feature = "database")]
pub use database::TestDb;
pub use scenario::{Exposition, Scenario, ScenarioAssert, get, post};
