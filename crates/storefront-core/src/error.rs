//! Shared error type across storefront crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Requested entity does not exist.
    NotFound,
    /// Entity or registration already exists.
    Conflict,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Conflict => "CONFLICT",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl StorefrontError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            StorefrontError::BadRequest(_) => ClientCode::BadRequest,
            StorefrontError::NotFound(_) => ClientCode::NotFound,
            StorefrontError::Conflict(_) => ClientCode::Conflict,
            StorefrontError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            StorefrontError::Internal(_) => ClientCode::Internal,
        }
    }
}
