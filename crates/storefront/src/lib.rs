//! Top-level facade crate for storefront.
//!
//! Re-exports core types and the server library so users can depend on a single crate.

pub mod core {
    pub use storefront_core::*;
}

pub mod server {
    pub use storefront_server::*;
}
