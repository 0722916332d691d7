//! storefront core: domain models and the error surface shared by the server
//! and any tooling built on top of it.
//!
//! This crate carries no HTTP or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `StorefrontError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;

/// Shared result type.
pub use error::{Result, StorefrontError};
pub use model::{NewProduct, NewUser, Product, User};
