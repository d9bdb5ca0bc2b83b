use super::collector::IssueCollector;
use super::registry::{MetricRegistry, TEXT_CONTENT_TYPE};
use crate::error::KiteError;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Shared state of the exposition endpoint
#[derive(Clone)]
pub struct MetricsState {
    pub registry: Arc<MetricRegistry>,
    /// Refreshed before every scrape when present
    pub collector: Option<Arc<IssueCollector>>,
}

impl MetricsState {
    pub fn new(registry: Arc<MetricRegistry>) -> Self {
        Self {
            registry,
            collector: None,
        }
    }

    pub fn with_collector(mut self, collector: Arc<IssueCollector>) -> Self {
        self.collector = Some(collector);
        self
    }
}

/// Handler for the /metrics endpoint.
///
/// Refreshes the aggregate gauges, then encodes a snapshot of the whole
/// registry. Collection failures never fail the scrape; only an encoding
/// failure yields a 500, with the crate's JSON error body.
pub async fn metrics_handler(State(state): State<MetricsState>) -> Response<Body> {
    if let Some(ref collector) = state.collector {
        collector.refresh().await;
    }

    let buffer = match state.registry.snapshot().encode_text() {
        Ok(buffer) => buffer,
        Err(e) => {
            return KiteError::internal(format!("Failed to encode metrics: {}", e)).into_response();
        }
    };

    plain_response(StatusCode::OK, Body::from(buffer))
}

fn plain_response(status: StatusCode, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static(TEXT_CONTENT_TYPE),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::{InMemoryIssueStore, IssueRecord};
    use crate::metrics::instruments::declare_standard;
    use crate::testing::get;
    use axum::{routing::get as axum_get, Router};

    fn router(state: MetricsState) -> Router {
        Router::new()
            .route("/metrics", axum_get(metrics_handler))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_scrape_returns_text_format() {
        let registry = Arc::new(MetricRegistry::new());
        declare_standard(&registry).unwrap();

        get(router(MetricsState::new(registry)), "/metrics")
            .execute()
            .await
            .assert_ok()
            .assert_header("content-type", TEXT_CONTENT_TYPE)
            .assert_contains("# TYPE http_requests_in_flight gauge")
            .await;
    }

    #[tokio::test]
    async fn test_scrape_refreshes_collector_first() {
        let registry = Arc::new(MetricRegistry::new());
        declare_standard(&registry).unwrap();
        let store = InMemoryIssueStore::new();
        let collector = Arc::new(IssueCollector::new(registry.clone(), Arc::new(store.clone())));
        let state = MetricsState::new(registry).with_collector(collector);

        store.insert(IssueRecord::new("i1", "a", "major", "active", "build"));

        get(router(state), "/metrics")
            .execute()
            .await
            .assert_ok()
            .assert_contains(r#"issues_by_namespace{namespace="a",state="active"} 1"#)
            .await;
    }

    #[tokio::test]
    async fn test_empty_registry_scrapes_successfully() {
        get(router(MetricsState::new(Arc::new(MetricRegistry::new()))), "/metrics")
            .execute()
            .await
            .assert_ok();
    }
}
