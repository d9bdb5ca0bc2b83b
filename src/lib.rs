//! Kite Exporter - pull-based Prometheus metrics for issue tracking services
//!
//! Built on Axum and the `prometheus` crate. Request metrics are recorded as
//! requests complete; issue and connection gauges are recomputed from the
//! issue store each time the metrics endpoint is scraped.
//!
//! # Features
//!
//! - **Registry**: named counters, gauges and histograms with validated labels
//! - **Request metrics**: a tower layer labelling by method, route template and status
//! - **Aggregate gauges**: grouped issue counts rebuilt on every scrape
//! - **Exposition**: Prometheus text format on a configurable path
//! - **Database**: SeaORM-backed issue store for PostgreSQL and SQLite
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kite_exporter::{App, ConfigBuilder};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     kite_exporter::init_tracing();
//!
//!     let config = ConfigBuilder::new().from_env().build()?;
//!     let app = App::with_config(config)?.connect_database().await?;
//!
//!     app.serve().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
#[cfg(feature = "database")]
pub mod database;
mod error;
pub mod issues;
pub mod metrics;
mod middleware;
pub mod testing;
pub mod traits;
pub mod utils;

// Re-exports for public API
pub use config::{Config, ConfigBuilder, LoggingConfig, ServerConfig};
pub use core::App;
pub use error::{ErrorResponse, KiteError, Result};
pub use issues::{AggregateRow, InMemoryIssueStore, IssueDimension, IssueRecord, PoolSnapshot};
pub use metrics::{
    IssueCollector, IssueLifecycleMetrics, MetricRegistry, MetricsConfig, MetricsConfigBuilder,
    UnmatchedPathPolicy,
};
pub use traits::IssueStore;
#[cfg(feature = "database")]
pub use database::{DatabaseConfig, SeaOrmIssueStore};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// Call early in `main()`, before creating the App.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "kite_exporter=debug")
/// - `KITE_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = utils::get_env_with_prefix("LOG_JSON")
        .and_then(|v| utils::parse_flag(&v))
        .unwrap_or(false);

    install_subscriber(env_filter, json_logs);
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    install_subscriber(EnvFilter::new(&config.logging.level), config.logging.json);
}

fn install_subscriber(env_filter: EnvFilter, json: bool) {
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
