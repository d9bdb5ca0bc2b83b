use crate::{
    config::Config,
    error::{KiteError, Result},
    metrics::{
        build_metrics_layer, declare_standard, metrics_handler, IssueCollector,
        IssueLifecycleMetrics, MetricRegistry, MetricsState,
    },
    middleware::MakeRequestUuid,
    traits::issue_store::IssueStore,
};
use anyhow::Context;
use axum::{http::Uri, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Exporter application: metrics endpoint, request metrics and any
/// application routes merged into it
pub struct App {
    config: Config,
    registry: Arc<MetricRegistry>,
    collector: Option<Arc<IssueCollector>>,
    routers: Vec<Router>,
}

impl App {
    /// Creates a new App with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Creates a new App with the provided configuration.
    ///
    /// Declares the standard instrument catalog up front, so an invalid
    /// namespace or conflicting declaration fails here rather than at the
    /// first request.
    pub fn with_config(config: Config) -> Result<Self> {
        let registry = match config.metrics.namespace {
            Some(ref namespace) => MetricRegistry::with_namespace(namespace.clone())?,
            None => MetricRegistry::new(),
        };
        declare_standard(&registry)?;

        Ok(Self {
            config,
            registry: Arc::new(registry),
            collector: None,
            routers: Vec::new(),
        })
    }

    /// Collect issue and connection gauges from `store` on every scrape
    pub fn with_issue_store(mut self, store: Arc<dyn IssueStore>) -> Self {
        self.collector = Some(Arc::new(IssueCollector::new(self.registry.clone(), store)));
        self
    }

    /// Connect to the configured issue database, if any, and collect from it
    #[cfg(feature = "database")]
    pub async fn connect_database(self) -> Result<Self> {
        let Some(ref database) = self.config.database else {
            tracing::info!("No issue database configured; issue gauges disabled");
            return Ok(self);
        };
        let store = crate::database::SeaOrmIssueStore::connect(database).await?;
        Ok(self.with_issue_store(Arc::new(store)))
    }

    /// Merge an application router.
    ///
    /// Its routes are wrapped by the request metrics middleware. A route on
    /// the metrics path conflicts with the endpoint and panics when the
    /// router is assembled.
    pub fn merge_router(mut self, router: Router) -> Self {
        self.routers.push(router);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> Arc<MetricRegistry> {
        self.registry.clone()
    }

    pub fn collector(&self) -> Option<Arc<IssueCollector>> {
        self.collector.clone()
    }

    /// Recorder for issue creation and resolution events
    pub fn lifecycle_metrics(&self) -> IssueLifecycleMetrics {
        IssueLifecycleMetrics::new(self.registry.clone())
    }

    /// Assemble the final router with the middleware stack applied
    pub fn into_router(self) -> Router {
        let mut router = Router::new();
        for extra in self.routers {
            router = router.merge(extra);
        }

        let metrics = &self.config.metrics;
        if metrics.enabled {
            let state = MetricsState {
                registry: self.registry.clone(),
                collector: self.collector.clone(),
            };
            router = router.merge(
                Router::new()
                    .route(metrics.path.as_str(), get(metrics_handler))
                    .with_state(state),
            );
        }

        router = router.fallback(not_found);

        // Middleware order (from inner to outer):
        // 1. Metrics, on the router itself so matched paths are visible
        if metrics.enabled {
            router = router.layer(build_metrics_layer(self.registry.clone(), metrics));
        }

        // 2. Request ID; the id must be set before it can be propagated,
        // so the set layer goes outside
        router = router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        // 3. HTTP tracing
        router.layer(TraceLayer::new_for_http())
    }

    /// Start the exporter server
    ///
    /// Returns once a shutdown signal has been handled, or with an error if
    /// the listener cannot be bound.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.addr().map_err(|e| {
            KiteError::internal(format!("Invalid server address in config: {}", e))
        })?;
        let metrics_path = self
            .config
            .metrics
            .enabled
            .then(|| self.config.metrics.path.clone());

        let router = self.into_router();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        tracing::info!("Server starting on http://{}", addr);
        if let Some(path) = metrics_path {
            tracing::info!("Metrics available at http://{}{}", addr, path);
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;
        Ok(())
    }
}

async fn not_found(uri: Uri) -> KiteError {
    KiteError::not_found(format!("No route for {}", uri.path()))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Give in-flight scrapes a grace period to finish
    tokio::time::sleep(Duration::from_secs(1)).await;
    tracing::info!("Shutdown complete");
}
