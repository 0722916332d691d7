//! Observability: metrics registry and the HTTP instrumentation layer.
//!
//! Metrics are stored as atomics on an explicit `MetricsRegistry` and rendered
//! by the scrape handler in `ops`.

pub mod http;
pub mod metrics;

pub use http::{track_http, HttpMetrics};
pub use metrics::MetricsRegistry;
