//! Standard instruments exposed by the exporter.

use super::error::MetricsError;
use super::registry::{InstrumentDesc, MetricRegistry};
use crate::issues::IssueDimension;
use std::sync::Arc;
use std::time::Duration;

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const HTTP_REQUESTS_IN_FLIGHT: &str = "http_requests_in_flight";

pub const ISSUES_TOTAL: &str = "issues_total";
pub const ISSUES_BY_NAMESPACE: &str = "issues_by_namespace";
pub const ISSUES_BY_SEVERITY: &str = "issues_by_severity";
pub const ISSUES_CREATED_TOTAL: &str = "issues_created_total";
pub const ISSUES_RESOLVED_TOTAL: &str = "issues_resolved_total";
pub const ISSUE_RESOLUTION_TIME_SECONDS: &str = "issue_resolution_time_seconds";

pub const DATABASE_CONNECTIONS_ACTIVE: &str = "database_connections_active";
pub const DATABASE_CONNECTIONS_IDLE: &str = "database_connections_idle";
pub const DATABASE_QUERY_DURATION_SECONDS: &str = "database_query_duration_seconds";

/// Default latency buckets, in seconds
pub const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Resolution time buckets: one minute up to one day
pub const RESOLUTION_TIME_BUCKETS: &[f64] = &[
    60.0, 300.0, 900.0, 1800.0, 3600.0, 7200.0, 14400.0, 28800.0, 86400.0,
];

/// A gauge vector recomputed from a grouped count on every scrape
#[derive(Debug, Clone, Copy)]
pub struct AggregateGauge {
    pub metric: &'static str,
    pub dimensions: &'static [IssueDimension],
}

impl AggregateGauge {
    pub fn label_names(&self) -> Vec<&'static str> {
        self.dimensions.iter().map(|d| d.label()).collect()
    }
}

/// Gauge vectors refreshed by the collector, in refresh order
pub const AGGREGATE_GAUGES: [AggregateGauge; 3] = [
    AggregateGauge {
        metric: ISSUES_TOTAL,
        dimensions: &[
            IssueDimension::Namespace,
            IssueDimension::Severity,
            IssueDimension::State,
            IssueDimension::Type,
        ],
    },
    AggregateGauge {
        metric: ISSUES_BY_NAMESPACE,
        dimensions: &[IssueDimension::Namespace, IssueDimension::State],
    },
    AggregateGauge {
        metric: ISSUES_BY_SEVERITY,
        dimensions: &[IssueDimension::Severity, IssueDimension::State],
    },
];

const LIFECYCLE_LABELS: &[&str] = &["namespace", "severity", "type"];

/// Descriptions of every standard instrument
pub fn standard_instruments() -> Vec<InstrumentDesc> {
    let [all, by_namespace, by_severity] = AGGREGATE_GAUGES;

    vec![
        InstrumentDesc::counter(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests")
            .labels(&["method", "endpoint", "status"]),
        InstrumentDesc::histogram(
            HTTP_REQUEST_DURATION_SECONDS,
            "HTTP request latency in seconds",
            LATENCY_BUCKETS,
        )
        .labels(&["method", "endpoint"]),
        InstrumentDesc::gauge(
            HTTP_REQUESTS_IN_FLIGHT,
            "Number of HTTP requests currently in flight",
        ),
        InstrumentDesc::gauge(
            all.metric,
            "Total number of issues by namespace, severity, state, and type",
        )
        .labels(&all.label_names()),
        InstrumentDesc::gauge(by_namespace.metric, "Number of issues per namespace")
            .labels(&by_namespace.label_names()),
        InstrumentDesc::gauge(by_severity.metric, "Number of issues by severity level")
            .labels(&by_severity.label_names()),
        InstrumentDesc::counter(ISSUES_CREATED_TOTAL, "Total number of issues created")
            .labels(LIFECYCLE_LABELS),
        InstrumentDesc::counter(ISSUES_RESOLVED_TOTAL, "Total number of issues resolved")
            .labels(LIFECYCLE_LABELS),
        InstrumentDesc::histogram(
            ISSUE_RESOLUTION_TIME_SECONDS,
            "Time taken to resolve issues in seconds",
            RESOLUTION_TIME_BUCKETS,
        )
        .labels(LIFECYCLE_LABELS),
        InstrumentDesc::gauge(
            DATABASE_CONNECTIONS_ACTIVE,
            "Number of active database connections",
        ),
        InstrumentDesc::gauge(DATABASE_CONNECTIONS_IDLE, "Number of idle database connections"),
        InstrumentDesc::histogram(
            DATABASE_QUERY_DURATION_SECONDS,
            "Database query latency in seconds",
            LATENCY_BUCKETS,
        )
        .labels(&["operation"]),
    ]
}

/// Declare every standard instrument on `registry`
pub fn declare_standard(registry: &MetricRegistry) -> Result<(), MetricsError> {
    for desc in standard_instruments() {
        registry.declare(desc)?;
    }
    Ok(())
}

/// Records issue lifecycle events from business logic.
///
/// Recording is best-effort: failures are logged and never returned.
#[derive(Clone)]
pub struct IssueLifecycleMetrics {
    registry: Arc<MetricRegistry>,
}

impl IssueLifecycleMetrics {
    pub fn new(registry: Arc<MetricRegistry>) -> Self {
        Self { registry }
    }

    /// Count a newly created issue
    pub fn record_created(&self, namespace: &str, severity: &str, issue_type: &str) {
        if let Err(e) = self
            .registry
            .increment(ISSUES_CREATED_TOTAL, &[namespace, severity, issue_type])
        {
            tracing::warn!(metric = ISSUES_CREATED_TOTAL, error = %e, "Failed to record issue creation");
        }
    }

    /// Count a resolved issue and how long it stayed open
    pub fn record_resolved(
        &self,
        namespace: &str,
        severity: &str,
        issue_type: &str,
        resolution_time: Duration,
    ) {
        let labels = [namespace, severity, issue_type];
        if let Err(e) = self.registry.increment(ISSUES_RESOLVED_TOTAL, &labels) {
            tracing::warn!(metric = ISSUES_RESOLVED_TOTAL, error = %e, "Failed to record issue resolution");
        }
        if let Err(e) =
            self.registry
                .observe_duration(ISSUE_RESOLUTION_TIME_SECONDS, &labels, resolution_time)
        {
            tracing::warn!(metric = ISSUE_RESOLUTION_TIME_SECONDS, error = %e, "Failed to record resolution time");
        }
    }
}
