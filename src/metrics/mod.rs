//! Prometheus metrics collection and exposition.
//!
//! - [`MetricRegistry`] owns every instrument and produces snapshots
//! - [`build_metrics_layer`] records request counts, latency and in-flight requests
//! - [`IssueCollector`] recomputes issue and connection gauges at scrape time
//! - [`metrics_handler`] serves the text exposition format

mod collector;
mod config;
mod error;
mod handler;
pub mod instruments;
mod middleware;
mod registry;

pub use collector::{IssueCollector, RefreshReport, VectorOutcome, VectorRefresh};
pub use config::{MetricsConfig, MetricsConfigBuilder, UnmatchedPathPolicy, UNMATCHED_ENDPOINT};
pub use error::MetricsError;
pub use handler::{metrics_handler, MetricsState};
pub use instruments::{declare_standard, IssueLifecycleMetrics};
pub use middleware::{build_metrics_layer, MetricsLayer, MetricsService};
pub use registry::{
    HistogramSample, InstrumentDesc, MetricKind, MetricRegistry, Sample, SampleValue, Snapshot,
    TEXT_CONTENT_TYPE,
};
