//! Per-request HTTP instrumentation.
//!
//! Attached once around the mounted route groups; handlers never touch
//! counters themselves.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use storefront_core::error::Result;

use super::metrics::{CounterVec, GaugeVec, HistogramVec, MetricsRegistry};

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION: &str = "http_request_duration_seconds";
pub const REQUESTS_IN_FLIGHT: &str = "http_requests_in_flight";

/// Path label for requests that matched no route (keeps cardinality bounded).
pub const UNMATCHED_PATH: &str = "unmatched";

pub struct HttpMetrics {
    pub requests: Arc<CounterVec>,
    pub duration: Arc<HistogramVec>,
    pub in_flight: Arc<GaugeVec>,
}

impl HttpMetrics {
    /// Register the HTTP families on `registry`.
    pub fn register(registry: &MetricsRegistry) -> Result<Self> {
        Ok(Self {
            requests: registry.counter(REQUESTS_TOTAL, "Total HTTP requests by method, path and status")?,
            duration: registry.histogram(REQUEST_DURATION, "HTTP request latency in seconds")?,
            in_flight: registry.gauge(REQUESTS_IN_FLIGHT, "HTTP requests currently being served")?,
        })
    }
}

/// Holds one `in_flight` slot; released on drop so cancelled requests
/// (client gone, timeout) do not leave the gauge raised.
struct InFlight {
    gauge: Arc<GaugeVec>,
    method: String,
}

impl InFlight {
    fn enter(gauge: &Arc<GaugeVec>, method: &str) -> Self {
        gauge.inc(&[("method", method)]);
        Self {
            gauge: Arc::clone(gauge),
            method: method.to_owned(),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.gauge.dec(&[("method", self.method.as_str())]);
    }
}

pub async fn track_http(
    State(metrics): State<Arc<HttpMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_PATH.to_owned());

    let guard = InFlight::enter(&metrics.in_flight, &method);
    let response = next.run(req).await;
    drop(guard);

    let elapsed = start.elapsed();
    let status = response.status().as_u16().to_string();
    let labels = [("method", method.as_str()), ("path", path.as_str()), ("status", status.as_str())];
    metrics.requests.inc(&labels);
    metrics.duration.observe(&labels, elapsed);

    tracing::debug!(%method, %path, %status, latency_ms = elapsed.as_secs_f64() * 1000.0, "request served");
    response
}
