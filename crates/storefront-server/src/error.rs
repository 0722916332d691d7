//! HTTP mapping for `StorefrontError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use storefront_core::error::StorefrontError;

/// Handler error; renders as `{ "error": CODE, "message": text }`.
#[derive(Debug)]
pub struct ApiError(pub StorefrontError);

impl From<StorefrontError> for ApiError {
    fn from(e: StorefrontError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StorefrontError::BadRequest(_) | StorefrontError::UnsupportedVersion => StatusCode::BAD_REQUEST,
            StorefrontError::NotFound(_) => StatusCode::NOT_FOUND,
            StorefrontError::Conflict(_) => StatusCode::CONFLICT,
            StorefrontError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
