use super::config::{MetricsConfig, UnmatchedPathPolicy};
use super::instruments::{
    HTTP_REQUEST_DURATION_SECONDS, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL,
};
use super::registry::MetricRegistry;
use axum::{
    extract::{MatchedPath, Request},
    response::Response,
};
use axum::body::Body;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::Service;

/// Build a Tower layer for request metrics.
///
/// Install it with `Router::layer` after all routes and the fallback have
/// been added, so the matched route template is visible to the middleware.
pub fn build_metrics_layer(registry: Arc<MetricRegistry>, config: &MetricsConfig) -> MetricsLayer {
    MetricsLayer {
        recorder: Arc::new(RequestRecorder {
            registry,
            unmatched_paths: config.unmatched_paths,
            track_in_flight: config.track_in_flight,
        }),
    }
}

/// Tower layer for request metrics
#[derive(Clone)]
pub struct MetricsLayer {
    recorder: Arc<RequestRecorder>,
}

impl<S> tower::Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService {
            inner,
            recorder: self.recorder.clone(),
        }
    }
}

/// Tower service for request metrics
#[derive(Clone)]
pub struct MetricsService<S> {
    inner: S,
    recorder: Arc<RequestRecorder>,
}

impl<S> Service<Request> for MetricsService<S>
where
    S: Service<Request, Response = Response<Body>>,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let recorder = self.recorder.clone();
        let start = Instant::now();
        let method = req.method().to_string();
        let endpoint = match req.extensions().get::<MatchedPath>() {
            Some(matched) => matched.as_str().to_string(),
            None => recorder.unmatched_paths.endpoint_label(req.uri().path()),
        };

        let in_flight = InFlightGuard::enter(&recorder);
        let fut = self.inner.call(req);

        Box::pin(async move {
            let result = fut.await;
            // Inner errors never carry a response; count them as server errors
            let status = match &result {
                Ok(response) => response.status().as_u16(),
                Err(_) => 500,
            };

            recorder.record(&method, &endpoint, status, start.elapsed());
            drop(in_flight);

            result
        })
    }
}

struct RequestRecorder {
    registry: Arc<MetricRegistry>,
    unmatched_paths: UnmatchedPathPolicy,
    track_in_flight: bool,
}

impl RequestRecorder {
    /// Record one finished request. Never fails: errors are logged only.
    fn record(&self, method: &str, endpoint: &str, status: u16, duration: Duration) {
        let status = status.to_string();

        if let Err(e) = self
            .registry
            .increment(HTTP_REQUESTS_TOTAL, &[method, endpoint, &status])
        {
            tracing::warn!(metric = HTTP_REQUESTS_TOTAL, error = %e, "Failed to record request");
        }

        if let Err(e) = self.registry.observe_duration(
            HTTP_REQUEST_DURATION_SECONDS,
            &[method, endpoint],
            duration,
        ) {
            tracing::warn!(metric = HTTP_REQUEST_DURATION_SECONDS, error = %e, "Failed to record request duration");
        }
    }

    fn adjust_in_flight(&self, delta: f64) {
        if let Err(e) = self.registry.add_to_gauge(HTTP_REQUESTS_IN_FLIGHT, &[], delta) {
            tracing::warn!(metric = HTTP_REQUESTS_IN_FLIGHT, error = %e, "Failed to update in-flight gauge");
        }
    }
}

/// Keeps a request counted as in flight until dropped, including when the
/// response future is cancelled
struct InFlightGuard {
    recorder: Option<Arc<RequestRecorder>>,
}

impl InFlightGuard {
    fn enter(recorder: &Arc<RequestRecorder>) -> Self {
        if !recorder.track_in_flight {
            return Self { recorder: None };
        }
        recorder.adjust_in_flight(1.0);
        Self {
            recorder: Some(recorder.clone()),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            recorder.adjust_in_flight(-1.0);
        }
    }
}
