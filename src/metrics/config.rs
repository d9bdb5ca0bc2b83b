use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::utils::{get_env_with_prefix, parse_flag};

/// Label used for every unmatched path under [`UnmatchedPathPolicy::Collapse`]
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

/// How the `endpoint` label is derived for requests that matched no route.
///
/// Matched requests always use the route template (e.g. `/issues/:id`).
/// Unmatched requests have no template, so their raw path would become a
/// label value; a client probing random paths can then create unbounded
/// numbers of series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPathPolicy {
    /// Use the literal request path
    #[default]
    Literal,
    /// Use the request path with numeric and UUID segments replaced
    Normalize,
    /// Use the fixed label `unmatched`
    Collapse,
}

impl UnmatchedPathPolicy {
    /// Endpoint label for an unmatched request to `path`
    pub fn endpoint_label(&self, path: &str) -> String {
        match self {
            Self::Literal => path.to_string(),
            Self::Normalize => normalize_path(path),
            Self::Collapse => UNMATCHED_ENDPOINT.to_string(),
        }
    }
}

impl FromStr for UnmatchedPathPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "normalize" => Ok(Self::Normalize),
            "collapse" => Ok(Self::Collapse),
            other => Err(format!(
                "unknown unmatched path policy '{}', expected literal, normalize or collapse",
                other
            )),
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Whether the metrics endpoint and request middleware are installed
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Path for the metrics endpoint (default: /metrics)
    #[serde(default = "default_path")]
    pub path: String,

    /// Prefix for every exposed metric name, e.g. `kite` gives `kite_issues_total`
    #[serde(default)]
    pub namespace: Option<String>,

    /// Endpoint labelling for requests that matched no route
    #[serde(default)]
    pub unmatched_paths: UnmatchedPathPolicy,

    /// Whether to maintain the in-flight request gauge
    #[serde(default = "default_track_in_flight")]
    pub track_in_flight: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: default_path(),
            namespace: None,
            unmatched_paths: UnmatchedPathPolicy::default(),
            track_in_flight: default_track_in_flight(),
        }
    }
}

impl MetricsConfig {
    /// Create a new MetricsConfig builder
    pub fn builder() -> MetricsConfigBuilder {
        MetricsConfigBuilder::new()
    }

    /// Load metrics configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(enabled) = get_env_with_prefix("METRICS_ENABLED") {
            config.enabled = parse_flag(&enabled).unwrap_or(true);
        }

        if let Some(path) = get_env_with_prefix("METRICS_PATH") {
            config.path = path;
        }

        if let Some(namespace) = get_env_with_prefix("METRICS_NAMESPACE") {
            config.namespace = Some(namespace).filter(|ns| !ns.is_empty());
        }

        if let Some(policy) = get_env_with_prefix("METRICS_UNMATCHED_PATHS") {
            match policy.parse() {
                Ok(policy) => config.unmatched_paths = policy,
                Err(e) => tracing::warn!("Ignoring METRICS_UNMATCHED_PATHS: {}", e),
            }
        }

        if let Some(track) = get_env_with_prefix("METRICS_TRACK_IN_FLIGHT") {
            config.track_in_flight = parse_flag(&track).unwrap_or(true);
        }

        config
    }
}

/// Builder for MetricsConfig
#[must_use = "builder does nothing until you call build()"]
pub struct MetricsConfigBuilder {
    config: MetricsConfig,
}

impl MetricsConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: MetricsConfig::default(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.namespace = Some(namespace.into());
        self
    }

    pub fn unmatched_paths(mut self, policy: UnmatchedPathPolicy) -> Self {
        self.config.unmatched_paths = policy;
        self
    }

    pub fn track_in_flight(mut self, track: bool) -> Self {
        self.config.track_in_flight = track;
        self
    }

    pub fn build(self) -> MetricsConfig {
        self.config
    }
}

impl Default for MetricsConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "/metrics".to_string()
}

fn default_track_in_flight() -> bool {
    true
}

/// Replace numeric and UUID path segments with placeholders
pub(crate) fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|part| {
            if part.parse::<u64>().is_ok() {
                ":id"
            } else if part.parse::<uuid::Uuid>().is_ok() {
                ":uuid"
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
        assert!(config.namespace.is_none());
        assert_eq!(config.unmatched_paths, UnmatchedPathPolicy::Literal);
        assert!(config.track_in_flight);
    }

    #[test]
    fn test_builder() {
        let config = MetricsConfig::builder()
            .enabled(false)
            .path("/custom-metrics")
            .namespace("kite")
            .unmatched_paths(UnmatchedPathPolicy::Collapse)
            .track_in_flight(false)
            .build();

        assert!(!config.enabled);
        assert_eq!(config.path, "/custom-metrics");
        assert_eq!(config.namespace.as_deref(), Some("kite"));
        assert_eq!(config.unmatched_paths, UnmatchedPathPolicy::Collapse);
        assert!(!config.track_in_flight);
    }

    #[test]
    fn test_path_normalization() {
        assert_eq!(normalize_path("/api/issues/123"), "/api/issues/:id");
        assert_eq!(normalize_path("/api/issues"), "/api/issues");
        assert_eq!(
            normalize_path("/api/issues/550e8400-e29b-41d4-a716-446655440000"),
            "/api/issues/:uuid"
        );
    }

    #[test]
    fn test_unmatched_policies() {
        assert_eq!(UnmatchedPathPolicy::Literal.endpoint_label("/xyz/42"), "/xyz/42");
        assert_eq!(UnmatchedPathPolicy::Normalize.endpoint_label("/xyz/42"), "/xyz/:id");
        assert_eq!(UnmatchedPathPolicy::Collapse.endpoint_label("/xyz/42"), "unmatched");
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Collapse".parse::<UnmatchedPathPolicy>(), Ok(UnmatchedPathPolicy::Collapse));
        assert_eq!("literal".parse::<UnmatchedPathPolicy>(), Ok(UnmatchedPathPolicy::Literal));
        assert!("bounded".parse::<UnmatchedPathPolicy>().is_err());
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        let config: MetricsConfig =
            serde_json::from_str(r#"{"unmatched_paths": "normalize"}"#).unwrap();
        assert_eq!(config.unmatched_paths, UnmatchedPathPolicy::Normalize);
        assert!(config.enabled);
    }
}
