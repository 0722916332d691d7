use std::net::SocketAddr;

use serde::Deserialize;
use storefront_core::error::{Result, StorefrontError};

use crate::obs::metrics::is_valid_metric_name;
use crate::ops::{HEALTHZ_PATH, READYZ_PATH};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorefrontConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl StorefrontConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(StorefrontError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.app.validate()?;
        self.metrics.validate()?;
        Ok(())
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            app: AppSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            StorefrontError::BadRequest(format!(
                "server.listen must be a valid socket address, got {:?}",
                self.listen
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Reported as the `version` label of the info metric.
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

impl AppSection {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StorefrontError::BadRequest("app.name must not be empty".into()));
        }
        if self.version.trim().is_empty() {
            return Err(StorefrontError::BadRequest("app.version must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Scrape endpoint.
    #[serde(default = "default_metrics_path")]
    pub path: String,

    #[serde(default = "default_info_metric")]
    pub info_metric: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            info_metric: default_info_metric(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') || self.path == "/" {
            return Err(StorefrontError::BadRequest(
                "metrics.path must start with '/' and not be the root".into(),
            ));
        }
        if self.path.contains(':') || self.path.contains('*') {
            return Err(StorefrontError::BadRequest(format!(
                "metrics.path must be a static path, got {}",
                self.path
            )));
        }
        if self.path == HEALTHZ_PATH || self.path == READYZ_PATH {
            return Err(StorefrontError::BadRequest(format!(
                "metrics.path collides with {}",
                self.path
            )));
        }
        if !is_valid_metric_name(&self.info_metric) {
            return Err(StorefrontError::BadRequest(format!(
                "metrics.info_metric is not a valid metric name: {}",
                self.info_metric
            )));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_app_name() -> String {
    "microservice".into()
}
fn default_app_version() -> String {
    "1.0.0".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_info_metric() -> String {
    "microservice_app_info".into()
}
