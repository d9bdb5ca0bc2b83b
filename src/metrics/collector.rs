//! Scrape-time aggregate collection.
//!
//! Issue gauges are not updated as issues change. Instead every scrape
//! resets each gauge vector and repopulates it from a grouped count, so the
//! exported series always match the store and no stale label combination
//! survives a successful refresh.
//!
//! Concurrent refreshes are not serialized: a scrape that overlaps another
//! one may briefly observe a vector holding rows from both.

use super::instruments::{
    AggregateGauge, AGGREGATE_GAUGES, DATABASE_CONNECTIONS_ACTIVE, DATABASE_CONNECTIONS_IDLE,
    DATABASE_QUERY_DURATION_SECONDS,
};
use super::registry::MetricRegistry;
use crate::error::{KiteError, Result};
use crate::traits::issue_store::IssueStore;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of refreshing one gauge vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorOutcome {
    /// The vector now holds exactly `series` label combinations
    Populated { series: usize },
    /// The query failed; the vector is empty until the next refresh
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorRefresh {
    pub metric: &'static str,
    pub outcome: VectorOutcome,
}

/// Summary of one refresh pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub vectors: Vec<VectorRefresh>,
    /// Whether the connection pool gauges were updated
    pub connections_updated: bool,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.connections_updated
            && self
                .vectors
                .iter()
                .all(|v| matches!(v.outcome, VectorOutcome::Populated { .. }))
    }

    pub fn outcome(&self, metric: &str) -> Option<VectorOutcome> {
        self.vectors
            .iter()
            .find(|v| v.metric == metric)
            .map(|v| v.outcome)
    }
}

/// Recomputes issue and connection gauges from the issue store
#[derive(Clone)]
pub struct IssueCollector {
    registry: Arc<MetricRegistry>,
    store: Arc<dyn IssueStore>,
}

impl IssueCollector {
    pub fn new(registry: Arc<MetricRegistry>, store: Arc<dyn IssueStore>) -> Self {
        Self { registry, store }
    }

    /// Refresh every collected gauge. Failures are logged, never returned.
    pub async fn refresh(&self) -> RefreshReport {
        let vectors = self.collect_issue_metrics().await;
        let connections_updated = self.collect_database_metrics();

        let report = RefreshReport {
            vectors,
            connections_updated,
        };
        tracing::debug!(
            complete = report.is_complete(),
            connections_updated,
            "Metrics refresh finished"
        );
        report
    }

    /// Rebuild each issue gauge vector from a fresh grouped count.
    ///
    /// One query per vector, no retries. A failed vector stays empty and the
    /// remaining vectors are still refreshed.
    pub async fn collect_issue_metrics(&self) -> Vec<VectorRefresh> {
        let mut refreshed = Vec::with_capacity(AGGREGATE_GAUGES.len());
        for gauge in &AGGREGATE_GAUGES {
            let outcome = match self.refresh_vector(gauge).await {
                Ok(series) => VectorOutcome::Populated { series },
                Err(e) => {
                    tracing::error!(metric = gauge.metric, error = %e, "Failed to collect issue metrics");
                    VectorOutcome::Failed
                }
            };
            refreshed.push(VectorRefresh {
                metric: gauge.metric,
                outcome,
            });
        }
        refreshed
    }

    async fn refresh_vector(&self, gauge: &AggregateGauge) -> Result<usize> {
        // Reset first: if the query fails the vector reads as "no data", never as stale data
        self.registry.reset_gauge_vector(gauge.metric)?;

        let started = Instant::now();
        let result = self.store.count_grouped(gauge.dimensions).await;
        if let Err(e) = self.registry.observe_duration(
            DATABASE_QUERY_DURATION_SECONDS,
            &[gauge.metric],
            started.elapsed(),
        ) {
            tracing::debug!(error = %e, "Query duration not recorded");
        }
        let rows = result?;

        let mut series = 0;
        for row in rows {
            // GROUP BY never yields empty groups; absent means zero
            if row.count <= 0 {
                continue;
            }
            let labels: Vec<&str> = row.dimensions.iter().map(String::as_str).collect();
            match self.registry.set_gauge(gauge.metric, &labels, row.count as f64) {
                Ok(()) => series += 1,
                Err(e) => {
                    tracing::warn!(metric = gauge.metric, error = %e, "Skipping malformed aggregate row");
                }
            }
        }

        Ok(series)
    }

    /// Copy pool occupancy into the connection gauges.
    ///
    /// On failure the gauges keep their previous values.
    pub fn collect_database_metrics(&self) -> bool {
        match self.update_connection_gauges() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to collect database connection metrics");
                false
            }
        }
    }

    fn update_connection_gauges(&self) -> Result<()> {
        let pool = self.store.pool_snapshot()?;
        self.registry
            .set_gauge(DATABASE_CONNECTIONS_ACTIVE, &[], f64::from(pool.in_use))
            .map_err(KiteError::from)?;
        self.registry
            .set_gauge(DATABASE_CONNECTIONS_IDLE, &[], f64::from(pool.idle))
            .map_err(KiteError::from)?;
        Ok(())
    }
}
