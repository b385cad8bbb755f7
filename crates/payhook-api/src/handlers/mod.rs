//! HTTP request handlers for the payhook API.
//!
//! Handlers stay thin: they translate HTTP into calls on the shared
//! `Ingestor` and map `PayhookError` into JSON error responses.
//!
//! - `ingest` - `POST /webhook`
//! - `history` - history page and JSON projection
//! - `health` - service info and liveness

pub mod health;
pub mod history;
pub mod ingest;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use payhook_core::PayhookError;
use serde::Serialize;

pub use health::{liveness_check, service_info};
pub use history::{list_history, view_history};
pub use ingest::ingest_webhook;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error description
    pub error: String,
    /// Error code from the taxonomy (E1001-E9999)
    pub code: &'static str,
}

/// HTTP status for each error kind.
pub fn status_for(error: &PayhookError) -> StatusCode {
    match error {
        PayhookError::InvalidPayload { .. } => StatusCode::BAD_REQUEST,
        PayhookError::InvalidSignature => StatusCode::FORBIDDEN,
        PayhookError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        PayhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Creates a standardized error response.
pub fn create_error_response(error: &PayhookError) -> Response {
    let body = ErrorResponse { error: error.to_string(), code: error.code() };
    (status_for(error), Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(status_for(&PayhookError::invalid_payload("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&PayhookError::InvalidSignature), StatusCode::FORBIDDEN);
        assert_eq!(
            status_for(&PayhookError::PayloadTooLarge { limit_bytes: 1 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_for(&PayhookError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_response_uses_mapped_status() {
        let response = create_error_response(&PayhookError::InvalidSignature);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
