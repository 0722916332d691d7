//! storefront server library entry.
//!
//! Wires config, metrics instrumentation, operational endpoints and the
//! users/products route groups into one axum router. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod obs;
pub mod ops;
pub mod router;
pub mod routes;
