//! Metrics errors.

use super::registry::MetricKind;

/// Errors raised by the metric registry.
///
/// `Configuration` and `LabelArity` are programmer errors: they surface at
/// declaration time or in tests, never from a correctly wired process.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Invalid or conflicting instrument declaration.
    #[error("invalid declaration for metric '{name}': {reason}")]
    Configuration { name: String, reason: String },

    /// Label values do not match the declared label names.
    #[error("metric '{name}' expects {expected} label values, got {got}")]
    LabelArity {
        name: String,
        expected: usize,
        got: usize,
    },

    /// No instrument with this name has been declared.
    #[error("metric '{0}' is not declared")]
    UnknownInstrument(String),

    /// The operation does not apply to the declared kind.
    #[error("metric '{name}' is a {actual}, not a {expected}")]
    KindMismatch {
        name: String,
        expected: MetricKind,
        actual: MetricKind,
    },

    /// Histogram samples must be finite and non-negative.
    #[error("metric '{name}' rejected observation {value}")]
    InvalidObservation { name: String, value: f64 },

    /// Error reported by the underlying prometheus client.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

impl MetricsError {
    pub(crate) fn configuration(name: &str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
