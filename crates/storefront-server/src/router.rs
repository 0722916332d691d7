//! Application bootstrap: router assembly, metrics attachment and route-group
//! mounting.
//!
//! Everything here runs once, synchronously, before the listener is bound.
//! Any failure aborts startup; a partially wired router is never returned.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, MethodRouter},
    Router,
};

use storefront_core::error::{Result, StorefrontError};

use crate::app_state::AppState;
use crate::config::StorefrontConfig;
use crate::obs::{track_http, HttpMetrics, MetricsRegistry};
use crate::ops;
use crate::routes::{self, RouteGroup};

/// A ready-to-serve router plus the state it shares with `main`.
pub struct App {
    pub router: Router,
    pub state: AppState,
}

/// Production wiring: fresh registry, default route groups.
pub fn build_app(cfg: StorefrontConfig) -> Result<App> {
    let state = AppState::new(cfg, Arc::new(MetricsRegistry::new()));
    let router = initialize(&state, &routes::default_groups())?;
    Ok(App { router, state })
}

/// Build the application router.
///
/// 1. attach HTTP instrumentation and the scrape endpoint,
/// 2. record the static info series,
/// 3. mount every route group under its prefix.
///
/// Metric families are registered on `state.registry()`; running this twice
/// against the same registry fails with `Conflict`.
pub fn initialize(state: &AppState, groups: &[Box<dyn RouteGroup>]) -> Result<Router> {
    let cfg = state.cfg();
    let registry = state.registry();

    let http = Arc::new(HttpMetrics::register(&registry)?);

    registry.info(
        &cfg.metrics.info_metric,
        "Application info",
        &[("version", cfg.app.version.as_str())],
    )?;

    let mut router = Router::new();
    for (path, handlers) in collect_routes(cfg, groups)? {
        if let Some(handler) = handlers.into_iter().reduce(MethodRouter::merge) {
            router = router.route(&path, handler);
        }
    }

    // Layer applies to routes registered so far (and the fallback); the ops
    // endpoints below stay uninstrumented.
    let router = router
        .layer(middleware::from_fn_with_state(http, track_http))
        .route(&cfg.metrics.path, get(ops::metrics).with_state(state.clone()))
        .route(ops::HEALTHZ_PATH, get(ops::healthz))
        .route(ops::READYZ_PATH, get(ops::readyz).with_state(state.clone()));

    tracing::info!(
        app = %cfg.app.name,
        version = %cfg.app.version,
        metrics_path = %cfg.metrics.path,
        groups = groups.len(),
        "application initialized"
    );
    Ok(router)
}

/// Validate every group and flatten its routes into `(full path, handlers)`,
/// grouping methods that share a path.
fn collect_routes(
    cfg: &StorefrontConfig,
    groups: &[Box<dyn RouteGroup>],
) -> Result<Vec<(String, Vec<MethodRouter>)>> {
    let reserved = [cfg.metrics.path.as_str(), ops::HEALTHZ_PATH, ops::READYZ_PATH];

    let mut prefixes = HashSet::new();
    let mut seen = HashSet::new();
    let mut mounted: Vec<String> = Vec::new();
    let mut out: Vec<(String, Vec<MethodRouter>)> = Vec::new();

    for group in groups {
        let name = group.name();
        let prefix = group.prefix();
        validate_prefix(name, prefix, &reserved)?;
        if !prefixes.insert(prefix) {
            return Err(StorefrontError::Conflict(format!(
                "route group {name}: prefix {prefix} already mounted"
            )));
        }

        for route in group.routes() {
            let (method, path, handler) = route.into_parts();
            if !path.starts_with('/') {
                return Err(StorefrontError::BadRequest(format!(
                    "route group {name}: path must start with '/': {path}"
                )));
            }
            let full = if path == "/" {
                prefix.to_string()
            } else {
                format!("{prefix}{path}")
            };
            if !seen.insert((method.clone(), full.clone())) {
                return Err(StorefrontError::Conflict(format!(
                    "route group {name}: duplicate route {method} {full}"
                )));
            }

            check_segments(&full).map_err(|e| {
                StorefrontError::BadRequest(format!("route group {name}: {e}"))
            })?;
            if let Some(other) = mounted.iter().find(|p| params_collide(p, &full)) {
                return Err(StorefrontError::Conflict(format!(
                    "route group {name}: {full} conflicts with {other}"
                )));
            }
            if !mounted.contains(&full) {
                mounted.push(full.clone());
            }

            tracing::info!(group = name, method = %method, path = %full, "route mounted");
            match out.iter_mut().find(|(p, _)| *p == full) {
                Some((_, handlers)) => handlers.push(handler),
                None => out.push((full, vec![handler])),
            }
        }
    }
    Ok(out)
}

fn validate_prefix(name: &str, prefix: &str, reserved: &[&str]) -> Result<()> {
    if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
        return Err(StorefrontError::BadRequest(format!(
            "route group {name}: prefix must look like /segment, got {prefix:?}"
        )));
    }
    let nested = format!("{prefix}/");
    if let Some(r) = reserved
        .iter()
        .find(|r| **r == prefix || r.starts_with(nested.as_str()))
    {
        return Err(StorefrontError::Conflict(format!(
            "route group {name}: prefix {prefix} overlaps reserved path {r}"
        )));
    }
    Ok(())
}

fn is_dynamic(seg: &str) -> bool {
    seg.starts_with(':') || seg.starts_with('*')
}

/// Parameters must span a whole segment, be named, and a catch-all must be
/// the last segment.
fn check_segments(path: &str) -> std::result::Result<(), String> {
    let segments: Vec<&str> = path.split('/').collect();
    for (i, seg) in segments.iter().enumerate() {
        if is_dynamic(seg) {
            if seg.len() == 1 {
                return Err(format!("unnamed parameter in {path}"));
            }
            if seg.starts_with('*') && i + 1 != segments.len() {
                return Err(format!("catch-all must be the last segment in {path}"));
            }
        } else if seg.contains(':') || seg.contains('*') {
            return Err(format!("parameter must span a whole segment in {path}"));
        }
    }
    Ok(())
}

/// Two distinct paths that share every leading segment and then diverge on
/// two dynamic segments (`/:id` vs `/:name`, `/:id/x` vs `/*rest`) cannot be
/// inserted into the same matcher, whatever their methods.
fn params_collide(a: &str, b: &str) -> bool {
    a.split('/')
        .zip(b.split('/'))
        .find(|(x, y)| x != y)
        .is_some_and(|(x, y)| is_dynamic(x) && is_dynamic(y))
}
