//! Shared application state for the storefront server.
//!
//! Holds the validated config, the explicit metrics registry and the
//! readiness flag. Route groups own their own state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::obs::MetricsRegistry;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: StorefrontConfig,
    registry: Arc<MetricsRegistry>,
    draining: AtomicBool,
}

impl AppState {
    pub fn new(cfg: StorefrontConfig, registry: Arc<MetricsRegistry>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                draining: AtomicBool::new(false),
            }),
        }
    }

    pub fn cfg(&self) -> &StorefrontConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> Arc<MetricsRegistry> {
        Arc::clone(&self.inner.registry)
    }

    /// Mark draining state (readiness turns 503).
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }
}
