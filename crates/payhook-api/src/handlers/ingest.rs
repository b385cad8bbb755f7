//! Webhook ingestion handler.
//!
//! Buffers the raw body (needed byte-for-byte for HMAC checks), captures
//! headers and query, and hands everything to the shared `Ingestor`.

use axum::{
    extract::{rejection::BytesRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use payhook_core::{Headers, PayhookError, QueryParams};
use tracing::{info, instrument, warn};

use crate::{handlers::create_error_response, AppState};

/// Accepts one notification.
///
/// # Errors
///
/// Returns appropriate HTTP status codes:
/// - 400: Body missing, not JSON, or empty
/// - 403: Signature verification enabled and failed
/// - 413: Body larger than the configured limit
/// - 500: Unexpected processing failure
#[instrument(
    name = "ingest_webhook",
    skip(state, headers, query, body),
    fields(
        content_length = headers
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown"),
        content_type = headers.get("content-type").and_then(|v| v.to_str().ok()).unwrap_or("none"),
    )
)]
pub async fn ingest_webhook(
    State(state): State<AppState>,
    Query(query): Query<QueryParams>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!(limit = state.limits.max_payload_bytes, "Payload exceeds size limit");
            return create_error_response(&PayhookError::PayloadTooLarge {
                limit_bytes: state.limits.max_payload_bytes,
            });
        },
        Err(rejection) => {
            warn!(error = %rejection, "Failed to read request body");
            return create_error_response(&PayhookError::invalid_payload(rejection.body_text()));
        },
    };

    let captured = extract_headers(&headers);

    match state.ingestor.ingest(&body, &captured, &query) {
        Ok(ack) => {
            info!(stored = state.ingestor.len(), "Notification acknowledged");
            (StatusCode::OK, Json(ack)).into_response()
        },
        Err(e) => create_error_response(&e),
    }
}

/// Extracts headers into a map keyed by lower-case name.
///
/// Repeated headers are joined with `", "`. Values that are not visible
/// ASCII are skipped.
pub fn extract_headers(headers: &HeaderMap) -> Headers {
    let mut map = Headers::new();
    for name in headers.keys() {
        let values: Vec<&str> =
            headers.get_all(name).iter().filter_map(|v| v.to_str().ok()).collect();
        if !values.is_empty() {
            map.insert(name.as_str().to_string(), values.join(", "));
        }
    }
    map
}
