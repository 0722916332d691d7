//! In-process metrics registry with Prometheus text rendering.
//!
//! Families are registered by name on an explicit `MetricsRegistry` and
//! rendered in registration order. Labels are flattened into sorted key
//! vectors to keep deterministic ordering. Histogram observations are stored
//! as integer microseconds and rendered in seconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use storefront_core::error::{Result, StorefrontError};

type LabelKey = Vec<(String, String)>;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Help text escaping (no quotes involved).
fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// `name{labels}` or plain `name` when there are no labels.
fn series(name: &str, labels: &str) -> String {
    if labels.is_empty() {
        name.to_string()
    } else {
        format!("{}{{{}}}", name, labels)
    }
}

/// Metric and label names: `[a-zA-Z_:][a-zA-Z0-9_:]*`.
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for a label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{} {}", series(name, &label_str(r.key())), val);
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) { self.add(labels, 1); }
    /// Decrement by 1.
    pub fn dec(&self, labels: &[(&str, &str)]) { self.add(labels, -1); }

    /// Add an arbitrary signed delta.
    pub fn add(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    /// Overwrite the value for a label set.
    pub fn set(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.store(v, Ordering::Relaxed);
    }

    fn render(&self, name: &str, out: &mut String) {
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{} {}", series(name, &label_str(r.key())), val);
        }
    }
}

// Upper bounds in microseconds: 5ms .. 10s
const BUCKETS_MICROS: [u64; 14] = [
    5_000, 10_000, 25_000, 50_000, 75_000, 100_000, 250_000, 500_000, 750_000,
    1_000_000, 2_500_000, 5_000_000, 7_500_000, 10_000_000,
];

fn micros_as_secs(micros: u64) -> f64 {
    micros as f64 / 1_000_000.0
}

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; BUCKETS_MICROS.len()],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration and increment cumulative buckets.
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(AtomicHistogram::default);
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of observations for a label set.
    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        for r in self.map.iter() {
            let hist = r.value();
            let labels = label_str(r.key());
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(
                    out,
                    "{}_bucket{{{}le=\"{}\"}} {}",
                    name,
                    prefix,
                    micros_as_secs(le),
                    count
                );
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);

            let sum = micros_as_secs(hist.sum.load(Ordering::Relaxed));
            let _ = writeln!(out, "{} {}", series(&format!("{name}_sum"), &labels), sum);
            let _ = writeln!(out, "{} {}", series(&format!("{name}_count"), &labels), count);
        }
    }
}

enum Collector {
    Counter(Arc<CounterVec>),
    Gauge(Arc<GaugeVec>),
    Histogram(Arc<HistogramVec>),
    /// Constant `1` gauge carrying static labels.
    Info(LabelKey),
}

impl Collector {
    fn type_name(&self) -> &'static str {
        match self {
            Collector::Counter(_) => "counter",
            Collector::Gauge(_) | Collector::Info(_) => "gauge",
            Collector::Histogram(_) => "histogram",
        }
    }
}

struct Family {
    name: String,
    help: String,
    collector: Collector,
}

/// Explicit (non-global) registry of metric families.
///
/// Each name can be registered once; a second registration of the same name
/// is rejected with `Conflict`, which is what makes re-running the bootstrap
/// against one registry a caller error.
#[derive(Default)]
pub struct MetricsRegistry {
    families: RwLock<Vec<Family>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, name: &str, help: &str, collector: Collector) -> Result<()> {
        if !is_valid_metric_name(name) {
            return Err(StorefrontError::BadRequest(format!("invalid metric name: {name}")));
        }
        let mut families = self
            .families
            .write()
            .map_err(|_| StorefrontError::Internal("metrics registry lock poisoned".into()))?;
        if families.iter().any(|f| f.name == name) {
            return Err(StorefrontError::Conflict(format!("metric already registered: {name}")));
        }
        families.push(Family {
            name: name.to_string(),
            help: help.to_string(),
            collector,
        });
        Ok(())
    }

    pub fn counter(&self, name: &str, help: &str) -> Result<Arc<CounterVec>> {
        let c = Arc::new(CounterVec::default());
        self.register(name, help, Collector::Counter(Arc::clone(&c)))?;
        Ok(c)
    }

    pub fn gauge(&self, name: &str, help: &str) -> Result<Arc<GaugeVec>> {
        let g = Arc::new(GaugeVec::default());
        self.register(name, help, Collector::Gauge(Arc::clone(&g)))?;
        Ok(g)
    }

    pub fn histogram(&self, name: &str, help: &str) -> Result<Arc<HistogramVec>> {
        let h = Arc::new(HistogramVec::default());
        self.register(name, help, Collector::Histogram(Arc::clone(&h)))?;
        Ok(h)
    }

    /// Register a static informational series (value `1`).
    pub fn info(&self, name: &str, help: &str, labels: &[(&str, &str)]) -> Result<()> {
        if let Some((k, _)) = labels.iter().find(|(k, _)| !is_valid_metric_name(k)) {
            return Err(StorefrontError::BadRequest(format!("invalid label name: {k}")));
        }
        self.register(name, help, Collector::Info(label_key(labels)))
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<String> {
        match self.families.read() {
            Ok(f) => f.iter().map(|f| f.name.clone()).collect(),
            Err(p) => p.into_inner().iter().map(|f| f.name.clone()).collect(),
        }
    }

    /// Render all families in Prometheus text exposition format (0.0.4).
    pub fn render(&self) -> String {
        let families = match self.families.read() {
            Ok(f) => f,
            Err(p) => p.into_inner(),
        };

        let mut out = String::new();
        for f in families.iter() {
            let _ = writeln!(out, "# HELP {} {}", f.name, escape_help(&f.help));
            let _ = writeln!(out, "# TYPE {} {}", f.name, f.collector.type_name());
            match &f.collector {
                Collector::Counter(c) => c.render(&f.name, &mut out),
                Collector::Gauge(g) => g.render(&f.name, &mut out),
                Collector::Histogram(h) => h.render(&f.name, &mut out),
                Collector::Info(labels) => {
                    let _ = writeln!(out, "{} 1", series(&f.name, &label_str(labels)));
                }
            }
        }
        out
    }
}
