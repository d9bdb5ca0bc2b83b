//! Process-wide metric registry.
//!
//! A thin, name-addressed layer over a [`prometheus::Registry`]. Instruments
//! are declared once at startup and then updated by name from any thread.
//! Every update is atomic per series; nothing here coordinates across series.

use super::error::MetricsError;
use prometheus::proto::{self, MetricFamily, MetricType};
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// Content type of the text exposition format
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Kind of a declared instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counter => write!(f, "counter"),
            Self::Gauge => write!(f, "gauge"),
            Self::Histogram => write!(f, "histogram"),
        }
    }
}

/// Declaration of one instrument: name, help text, kind and label names.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentDesc {
    name: String,
    help: String,
    kind: MetricKind,
    label_names: Vec<String>,
    buckets: Vec<f64>,
}

impl InstrumentDesc {
    fn new(name: impl Into<String>, help: impl Into<String>, kind: MetricKind) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            kind,
            label_names: Vec::new(),
            buckets: Vec::new(),
        }
    }

    /// Describe a monotonically increasing counter
    pub fn counter(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, help, MetricKind::Counter)
    }

    /// Describe a gauge
    pub fn gauge(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, help, MetricKind::Gauge)
    }

    /// Describe a histogram with fixed bucket upper bounds
    pub fn histogram(name: impl Into<String>, help: impl Into<String>, buckets: &[f64]) -> Self {
        let mut desc = Self::new(name, help, MetricKind::Histogram);
        desc.buckets = buckets.to_vec();
        desc
    }

    /// Set the ordered label names
    pub fn labels(mut self, names: &[&str]) -> Self {
        self.label_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn buckets(&self) -> &[f64] {
        &self.buckets
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.label_names == other.label_names
            && self.buckets == other.buckets
    }

    fn validate(&self) -> Result<(), MetricsError> {
        if !is_valid_metric_name(&self.name) {
            return Err(MetricsError::configuration(&self.name, "invalid metric name"));
        }
        if self.help.is_empty() {
            return Err(MetricsError::configuration(&self.name, "help text is empty"));
        }
        for (i, label) in self.label_names.iter().enumerate() {
            if !is_valid_label_name(label) {
                return Err(MetricsError::configuration(
                    &self.name,
                    format!("invalid label name '{}'", label),
                ));
            }
            if self.label_names[..i].contains(label) {
                return Err(MetricsError::configuration(
                    &self.name,
                    format!("duplicate label name '{}'", label),
                ));
            }
        }
        if self.kind == MetricKind::Histogram {
            if self.buckets.is_empty() {
                return Err(MetricsError::configuration(&self.name, "histogram has no buckets"));
            }
            if self.buckets.iter().any(|b| !b.is_finite()) {
                return Err(MetricsError::configuration(&self.name, "bucket bounds must be finite"));
            }
            if self.buckets.windows(2).any(|w| w[0] >= w[1]) {
                return Err(MetricsError::configuration(
                    &self.name,
                    "bucket bounds must be strictly increasing",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
enum Series {
    Counter(IntCounterVec),
    Gauge(GaugeVec),
    Histogram(HistogramVec),
}

struct Instrument {
    desc: InstrumentDesc,
    series: Series,
}

impl Instrument {
    fn check_kind(&self, expected: MetricKind) -> Result<(), MetricsError> {
        if self.desc.kind != expected {
            return Err(MetricsError::KindMismatch {
                name: self.desc.name.clone(),
                expected,
                actual: self.desc.kind,
            });
        }
        Ok(())
    }

    fn check_arity(&self, label_values: &[&str]) -> Result<(), MetricsError> {
        let expected = self.desc.label_names.len();
        if label_values.len() != expected {
            return Err(MetricsError::LabelArity {
                name: self.desc.name.clone(),
                expected,
                got: label_values.len(),
            });
        }
        Ok(())
    }
}

/// Registry of named instruments.
///
/// Create one per process (or per test) and share it as `Arc<MetricRegistry>`.
pub struct MetricRegistry {
    registry: Registry,
    namespace: Option<String>,
    instruments: RwLock<HashMap<String, Arc<Instrument>>>,
}

impl MetricRegistry {
    /// Create an empty registry whose metrics are exposed under their declared names
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            namespace: None,
            instruments: RwLock::new(HashMap::new()),
        }
    }

    /// Create an empty registry that exposes every metric as `{namespace}_{name}`
    pub fn with_namespace(namespace: impl Into<String>) -> Result<Self, MetricsError> {
        let namespace = namespace.into();
        if !is_valid_label_name(&namespace) {
            return Err(MetricsError::configuration(&namespace, "invalid namespace"));
        }
        Ok(Self {
            namespace: Some(namespace),
            ..Self::new()
        })
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Declare an instrument.
    ///
    /// Declaring the same shape twice is a no-op. A name already declared with
    /// a different kind, label set or bucket layout is rejected.
    pub fn declare(&self, desc: InstrumentDesc) -> Result<(), MetricsError> {
        desc.validate()?;

        let mut instruments = self
            .instruments
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = instruments.get(desc.name()) {
            if existing.desc.same_shape(&desc) {
                return Ok(());
            }
            return Err(MetricsError::configuration(
                desc.name(),
                format!(
                    "already declared as a {} with labels {:?}",
                    existing.desc.kind, existing.desc.label_names
                ),
            ));
        }

        let labels: Vec<&str> = desc.label_names.iter().map(String::as_str).collect();
        let series = match desc.kind {
            MetricKind::Counter => {
                let vec = IntCounterVec::new(self.opts(&desc), &labels)?;
                self.registry.register(Box::new(vec.clone()))?;
                Series::Counter(vec)
            }
            MetricKind::Gauge => {
                let vec = GaugeVec::new(self.opts(&desc), &labels)?;
                self.registry.register(Box::new(vec.clone()))?;
                Series::Gauge(vec)
            }
            MetricKind::Histogram => {
                let mut opts = HistogramOpts::new(desc.name.clone(), desc.help.clone())
                    .buckets(desc.buckets.clone());
                if let Some(ref namespace) = self.namespace {
                    opts = opts.namespace(namespace.clone());
                }
                let vec = HistogramVec::new(opts, &labels)?;
                self.registry.register(Box::new(vec.clone()))?;
                Series::Histogram(vec)
            }
        };

        // Scalar instruments are exposed from the first scrape, not the first update
        if labels.is_empty() {
            match &series {
                Series::Counter(vec) => drop(vec.get_metric_with_label_values(&[])?),
                Series::Gauge(vec) => drop(vec.get_metric_with_label_values(&[])?),
                Series::Histogram(vec) => drop(vec.get_metric_with_label_values(&[])?),
            }
        }

        tracing::debug!(metric = %desc.name, kind = %desc.kind, "Declared metric");
        instruments.insert(desc.name.clone(), Arc::new(Instrument { desc, series }));
        Ok(())
    }

    fn opts(&self, desc: &InstrumentDesc) -> Opts {
        let opts = Opts::new(desc.name.clone(), desc.help.clone());
        match self.namespace {
            Some(ref namespace) => opts.namespace(namespace.clone()),
            None => opts,
        }
    }

    fn instrument(&self, name: &str) -> Result<Arc<Instrument>, MetricsError> {
        self.instruments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| MetricsError::UnknownInstrument(name.to_string()))
    }

    /// Whether an instrument with this name has been declared
    pub fn is_declared(&self, name: &str) -> bool {
        self.instrument(name).is_ok()
    }

    /// Add one to a counter series
    pub fn increment(&self, name: &str, label_values: &[&str]) -> Result<(), MetricsError> {
        self.increment_by(name, label_values, 1)
    }

    /// Add `amount` to a counter series
    pub fn increment_by(
        &self,
        name: &str,
        label_values: &[&str],
        amount: u64,
    ) -> Result<(), MetricsError> {
        let instrument = self.instrument(name)?;
        instrument.check_kind(MetricKind::Counter)?;
        instrument.check_arity(label_values)?;
        if let Series::Counter(ref vec) = instrument.series {
            vec.get_metric_with_label_values(label_values)?.inc_by(amount);
        }
        Ok(())
    }

    /// Record one histogram sample, in seconds
    pub fn observe(&self, name: &str, label_values: &[&str], value: f64) -> Result<(), MetricsError> {
        let instrument = self.instrument(name)?;
        instrument.check_kind(MetricKind::Histogram)?;
        instrument.check_arity(label_values)?;
        if !value.is_finite() || value < 0.0 {
            return Err(MetricsError::InvalidObservation {
                name: name.to_string(),
                value,
            });
        }
        if let Series::Histogram(ref vec) = instrument.series {
            vec.get_metric_with_label_values(label_values)?.observe(value);
        }
        Ok(())
    }

    /// Record one histogram sample from a duration
    pub fn observe_duration(
        &self,
        name: &str,
        label_values: &[&str],
        duration: Duration,
    ) -> Result<(), MetricsError> {
        self.observe(name, label_values, duration.as_secs_f64())
    }

    /// Set a gauge series, creating it if needed
    pub fn set_gauge(&self, name: &str, label_values: &[&str], value: f64) -> Result<(), MetricsError> {
        let gauge = self.gauge_vec(name, label_values)?;
        gauge.get_metric_with_label_values(label_values)?.set(value);
        Ok(())
    }

    /// Add `delta` (which may be negative) to a gauge series
    pub fn add_to_gauge(&self, name: &str, label_values: &[&str], delta: f64) -> Result<(), MetricsError> {
        let gauge = self.gauge_vec(name, label_values)?;
        gauge.get_metric_with_label_values(label_values)?.add(delta);
        Ok(())
    }

    /// Drop every series of a gauge vector
    pub fn reset_gauge_vector(&self, name: &str) -> Result<(), MetricsError> {
        let instrument = self.instrument(name)?;
        instrument.check_kind(MetricKind::Gauge)?;
        if let Series::Gauge(ref vec) = instrument.series {
            vec.reset();
        }
        Ok(())
    }

    fn gauge_vec(&self, name: &str, label_values: &[&str]) -> Result<GaugeVec, MetricsError> {
        let instrument = self.instrument(name)?;
        instrument.check_kind(MetricKind::Gauge)?;
        instrument.check_arity(label_values)?;
        let Series::Gauge(ref vec) = instrument.series else {
            return Err(MetricsError::UnknownInstrument(name.to_string()));
        };
        Ok(vec.clone())
    }

    /// Capture the current value of every series.
    ///
    /// Each series is read atomically; series are not read at one instant.
    pub fn snapshot(&self) -> Snapshot {
        let families = self.registry.gather();
        let layouts = self
            .instruments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|instrument| {
                let full_name = match self.namespace {
                    Some(ref namespace) => format!("{}_{}", namespace, instrument.desc.name),
                    None => instrument.desc.name.clone(),
                };
                let layout = SeriesLayout {
                    name: instrument.desc.name.clone(),
                    kind: instrument.desc.kind,
                    label_names: instrument.desc.label_names.clone(),
                };
                (full_name, layout)
            })
            .collect();

        Snapshot { families, layouts }
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct SeriesLayout {
    name: String,
    kind: MetricKind,
    label_names: Vec<String>,
}

/// Point-in-time copy of every series in a [`MetricRegistry`]
pub struct Snapshot {
    families: Vec<MetricFamily>,
    layouts: HashMap<String, SeriesLayout>,
}

/// One series in a [`Snapshot`]
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<'a> {
    /// Declared (un-namespaced) metric name
    pub name: &'a str,
    pub kind: MetricKind,
    /// Label values in declaration order
    pub label_values: Vec<&'a str>,
    pub value: SampleValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    /// Counter or gauge value
    Scalar(f64),
    Histogram(HistogramSample),
}

/// Accumulated state of one histogram series
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSample {
    pub count: u64,
    pub sum: f64,
    /// `(upper bound, cumulative count)` per bucket
    pub buckets: Vec<(f64, u64)>,
}

impl Snapshot {
    /// Iterate over every series. May be called any number of times.
    pub fn iter(&self) -> impl Iterator<Item = Sample<'_>> + '_ {
        self.families
            .iter()
            .filter_map(|family| {
                self.layouts
                    .get(family.get_name())
                    .map(|layout| (family, layout))
            })
            .flat_map(|(family, layout)| {
                let kind = family.get_field_type();
                family
                    .get_metric()
                    .iter()
                    .map(move |metric| sample_from(layout, kind, metric))
            })
    }

    /// Value of a counter or gauge series
    pub fn value(&self, name: &str, label_values: &[&str]) -> Option<f64> {
        self.find(name, label_values).and_then(|sample| match sample.value {
            SampleValue::Scalar(v) => Some(v),
            SampleValue::Histogram(_) => None,
        })
    }

    /// Accumulated state of a histogram series
    pub fn histogram(&self, name: &str, label_values: &[&str]) -> Option<HistogramSample> {
        self.find(name, label_values).and_then(|sample| match sample.value {
            SampleValue::Histogram(h) => Some(h),
            SampleValue::Scalar(_) => None,
        })
    }

    /// Label value tuples currently present for a metric, sorted
    pub fn series(&self, name: &str) -> Vec<Vec<String>> {
        let mut series: Vec<Vec<String>> = self
            .iter()
            .filter(|sample| sample.name == name)
            .map(|sample| sample.label_values.iter().map(|v| v.to_string()).collect())
            .collect();
        series.sort();
        series
    }

    fn find(&self, name: &str, label_values: &[&str]) -> Option<Sample<'_>> {
        self.iter()
            .find(|sample| sample.name == name && sample.label_values == label_values)
    }

    /// Encode in the Prometheus text exposition format
    pub fn encode_text(&self) -> Result<Vec<u8>, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.families, &mut buffer)?;
        Ok(buffer)
    }
}

fn sample_from<'a>(layout: &'a SeriesLayout, kind: MetricType, metric: &'a proto::Metric) -> Sample<'a> {
    let pairs = metric.get_label();
    let label_values = layout
        .label_names
        .iter()
        .map(|label| {
            pairs
                .iter()
                .find(|pair| pair.get_name() == label)
                .map(|pair| pair.get_value())
                .unwrap_or("")
        })
        .collect();

    let value = match kind {
        MetricType::COUNTER => SampleValue::Scalar(metric.get_counter().get_value()),
        MetricType::HISTOGRAM => {
            let histogram = metric.get_histogram();
            SampleValue::Histogram(HistogramSample {
                count: histogram.get_sample_count(),
                sum: histogram.get_sample_sum(),
                buckets: histogram
                    .get_bucket()
                    .iter()
                    .map(|b| (b.get_upper_bound(), b.get_cumulative_count()))
                    .collect(),
            })
        }
        _ => SampleValue::Scalar(metric.get_gauge().get_value()),
    };

    Sample {
        name: &layout.name,
        kind: layout.kind,
        label_values,
        value,
    }
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    !name.starts_with("__") && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_requests() -> MetricRegistry {
        let registry = MetricRegistry::new();
        registry
            .declare(
                InstrumentDesc::counter("requests_total", "Requests").labels(&["method", "status"]),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_declare_is_idempotent_for_same_shape() {
        let registry = registry_with_requests();
        let again = InstrumentDesc::counter("requests_total", "Requests").labels(&["method", "status"]);
        assert!(registry.declare(again).is_ok());
    }

    #[test]
    fn test_declare_rejects_incompatible_shape() {
        let registry = registry_with_requests();

        let other_labels = InstrumentDesc::counter("requests_total", "Requests").labels(&["method"]);
        assert!(matches!(
            registry.declare(other_labels),
            Err(MetricsError::Configuration { .. })
        ));

        let other_kind = InstrumentDesc::gauge("requests_total", "Requests").labels(&["method", "status"]);
        assert!(matches!(
            registry.declare(other_kind),
            Err(MetricsError::Configuration { .. })
        ));
    }

    #[test]
    fn test_declare_validates_names_and_buckets() {
        let registry = MetricRegistry::new();
        assert!(registry.declare(InstrumentDesc::counter("1bad", "x")).is_err());
        assert!(registry.declare(InstrumentDesc::counter("ok_total", "x").labels(&["__reserved"])).is_err());
        assert!(registry.declare(InstrumentDesc::counter("dup_total", "x").labels(&["a", "a"])).is_err());
        assert!(registry.declare(InstrumentDesc::histogram("h_seconds", "x", &[])).is_err());
        assert!(registry.declare(InstrumentDesc::histogram("h_seconds", "x", &[1.0, 0.5])).is_err());
        assert!(registry.declare(InstrumentDesc::histogram("h_seconds", "x", &[0.5, 1.0])).is_ok());
    }

    #[test]
    fn test_increment_counts_per_label_tuple() {
        let registry = registry_with_requests();
        registry.increment("requests_total", &["GET", "200"]).unwrap();
        registry.increment("requests_total", &["GET", "200"]).unwrap();
        registry.increment_by("requests_total", &["POST", "201"], 5).unwrap();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.value("requests_total", &["GET", "200"]), Some(2.0));
        assert_eq!(snapshot.value("requests_total", &["POST", "201"]), Some(5.0));
        assert_eq!(snapshot.value("requests_total", &["GET", "404"]), None);
    }

    #[test]
    fn test_label_arity_is_checked() {
        let registry = registry_with_requests();
        let err = registry.increment("requests_total", &["GET"]).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::LabelArity { expected: 2, got: 1, .. }
        ));
    }

    #[test]
    fn test_kind_mismatch_and_unknown_instrument() {
        let registry = registry_with_requests();
        assert!(matches!(
            registry.set_gauge("requests_total", &["GET", "200"], 1.0),
            Err(MetricsError::KindMismatch { .. })
        ));
        assert!(matches!(
            registry.increment("missing_total", &[]),
            Err(MetricsError::UnknownInstrument(_))
        ));
    }

    #[test]
    fn test_observe_rejects_invalid_values() {
        let registry = MetricRegistry::new();
        registry
            .declare(InstrumentDesc::histogram("latency_seconds", "Latency", &[0.1, 1.0]).labels(&["op"]))
            .unwrap();

        assert!(registry.observe("latency_seconds", &["read"], -1.0).is_err());
        assert!(registry.observe("latency_seconds", &["read"], f64::NAN).is_err());
        assert!(registry.observe("latency_seconds", &["read"], f64::INFINITY).is_err());

        registry.observe("latency_seconds", &["read"], 0.05).unwrap();
        registry
            .observe_duration("latency_seconds", &["read"], Duration::from_millis(500))
            .unwrap();

        let histogram = registry.snapshot().histogram("latency_seconds", &["read"]).unwrap();
        assert_eq!(histogram.count, 2);
        assert_eq!(histogram.buckets, vec![(0.1, 1), (1.0, 2)]);
    }

    #[test]
    fn test_reset_gauge_vector_removes_all_series() {
        let registry = MetricRegistry::new();
        registry
            .declare(InstrumentDesc::gauge("open_items", "Open items").labels(&["team"]))
            .unwrap();
        registry.set_gauge("open_items", &["a"], 3.0).unwrap();
        registry.set_gauge("open_items", &["b"], 1.0).unwrap();
        assert_eq!(registry.snapshot().series("open_items").len(), 2);

        registry.reset_gauge_vector("open_items").unwrap();
        assert!(registry.snapshot().series("open_items").is_empty());

        registry.set_gauge("open_items", &["c"], 7.0).unwrap();
        assert_eq!(registry.snapshot().series("open_items"), vec![vec!["c".to_string()]]);
    }

    #[test]
    fn test_scalar_instruments_are_exposed_immediately() {
        let registry = MetricRegistry::new();
        registry
            .declare(InstrumentDesc::gauge("connections_idle", "Idle connections"))
            .unwrap();
        assert_eq!(registry.snapshot().value("connections_idle", &[]), Some(0.0));

        registry.add_to_gauge("connections_idle", &[], 2.0).unwrap();
        registry.add_to_gauge("connections_idle", &[], -1.0).unwrap();
        assert_eq!(registry.snapshot().value("connections_idle", &[]), Some(1.0));
    }

    #[test]
    fn test_snapshot_is_restartable_and_ordered_by_declaration() {
        let registry = MetricRegistry::new();
        registry
            .declare(InstrumentDesc::gauge("by_team", "x").labels(&["zone", "agent"]))
            .unwrap();
        registry.set_gauge("by_team", &["eu", "alpha"], 1.0).unwrap();

        let snapshot = registry.snapshot();
        let first: Vec<_> = snapshot.iter().collect();
        let second: Vec<_> = snapshot.iter().collect();
        assert_eq!(first, second);
        // Label values follow declaration order, not alphabetical order
        assert_eq!(first[0].label_values, vec!["eu", "alpha"]);
    }

    #[test]
    fn test_namespace_prefixes_exposed_names() {
        let registry = MetricRegistry::with_namespace("kite").unwrap();
        registry
            .declare(InstrumentDesc::counter("jobs_total", "Jobs"))
            .unwrap();
        registry.increment("jobs_total", &[]).unwrap();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.value("jobs_total", &[]), Some(1.0));

        let text = String::from_utf8(snapshot.encode_text().unwrap()).unwrap();
        assert!(text.contains("# TYPE kite_jobs_total counter"));
        assert!(text.contains("kite_jobs_total 1"));
    }

    #[test]
    fn test_invalid_namespace_is_rejected() {
        assert!(MetricRegistry::with_namespace("kite-app").is_err());
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let registry = registry_with_requests();
        std::thread::scope(|scope| {
            for _ in 0..100 {
                scope.spawn(|| registry.increment("requests_total", &["GET", "200"]).unwrap());
            }
        });
        assert_eq!(
            registry.snapshot().value("requests_total", &["GET", "200"]),
            Some(100.0)
        );
    }
}
