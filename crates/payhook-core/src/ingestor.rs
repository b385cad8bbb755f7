//! Notification ingestion: validate, verify, record, acknowledge.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    error::PayhookError,
    history::HistoryBuffer,
    models::{Acknowledgement, Headers, NotificationKind, NotificationRecord, QueryParams},
    signature::SignaturePolicy,
    time::Clock,
    Result,
};

/// Characters of the payload included in the ingestion log line.
pub const PREVIEW_CHARS: usize = 100;

/// Accepts notifications and owns the bounded history.
///
/// The history is only reachable through `ingest` and `list_history`.
/// Share an ingestor between request handlers with `Arc`.
#[derive(Debug)]
pub struct Ingestor {
    history: HistoryBuffer,
    policy: SignaturePolicy,
    clock: Arc<dyn Clock>,
}

impl Ingestor {
    /// Creates an ingestor with an empty history of `capacity` records.
    pub fn new(capacity: usize, policy: SignaturePolicy, clock: Arc<dyn Clock>) -> Self {
        Self { history: HistoryBuffer::new(capacity), policy, clock }
    }

    /// Validates and records one notification.
    ///
    /// `headers` must be keyed by lower-case name. Nothing is recorded
    /// unless every check passes.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` if verification is enabled and fails
    /// - `InvalidPayload` if the body is not JSON or is an empty value
    pub fn ingest(
        &self,
        raw_body: &[u8],
        headers: &Headers,
        query: &QueryParams,
    ) -> Result<Acknowledgement> {
        if let Err(e) = self.policy.check(raw_body, headers) {
            warn!(body_len = raw_body.len(), "Rejecting notification with invalid signature");
            return Err(e);
        }

        let payload = parse_payload(raw_body).inspect_err(|e| {
            warn!(error = %e, body_len = raw_body.len(), "Rejecting invalid notification payload");
        })?;

        let record =
            NotificationRecord::new(self.clock.now_utc(), payload, headers.clone(), query.clone());

        info!(
            notification_id = %record.id,
            kind = %record.kind,
            preview = %payload_preview(&record.payload),
            "Notification received"
        );
        log_classification(&record);

        let id = record.id;
        if let Some(old) = self.history.push(record) {
            debug!(evicted_id = %old.id, "History full, dropped oldest notification");
        }
        debug!(notification_id = %id, stored = self.history.len(), "Notification stored");

        Ok(Acknowledgement::success())
    }

    /// Returns the stored notifications, newest first.
    pub fn list_history(&self) -> Vec<NotificationRecord> {
        self.history.snapshot()
    }

    /// Maximum number of notifications retained.
    pub fn capacity(&self) -> usize {
        self.history.capacity()
    }

    /// Number of notifications currently retained.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no notification has been retained yet.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Whether incoming notifications must be signed.
    pub fn verification_enabled(&self) -> bool {
        self.policy.is_enabled()
    }
}

/// Parses a notification body, rejecting empty values.
///
/// # Errors
///
/// Returns `InvalidPayload` for blank bodies, malformed JSON, and `null`,
/// `""`, `[]` or `{}`.
pub fn parse_payload(raw_body: &[u8]) -> Result<Value> {
    if raw_body.iter().all(u8::is_ascii_whitespace) {
        return Err(PayhookError::invalid_payload("request body is empty"));
    }

    let payload: Value = serde_json::from_slice(raw_body)
        .map_err(|e| PayhookError::invalid_payload(format!("body is not valid JSON: {e}")))?;

    if is_empty_value(&payload) {
        return Err(PayhookError::invalid_payload("notification has no data"));
    }

    Ok(payload)
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Compact textual form of a payload, cut to `PREVIEW_CHARS` characters.
pub fn payload_preview(payload: &Value) -> String {
    payload.to_string().chars().take(PREVIEW_CHARS).collect()
}

fn log_classification(record: &NotificationRecord) {
    let reference = record.reference.as_deref().unwrap_or("unknown");
    match record.kind {
        NotificationKind::Payment => {
            info!(notification_id = %record.id, payment_id = reference, "Payment notification");
        },
        NotificationKind::Transfer => {
            info!(notification_id = %record.id, transfer_id = reference, "Transfer notification");
        },
        NotificationKind::Other | NotificationKind::Unspecified => {
            debug!(notification_id = %record.id, kind = %record.kind, "Unclassified notification");
        },
    }
}
