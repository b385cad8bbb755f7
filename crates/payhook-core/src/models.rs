//! Notification records and related identifiers.
//!
//! A `NotificationRecord` is created once per accepted webhook and never
//! modified afterwards. Classification (`NotificationKind`) is derived from
//! the payload for logging and display only.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Request headers captured with a notification, keyed by lower-case name.
pub type Headers = BTreeMap<String, String>;

/// Query-string parameters captured with a notification.
pub type QueryParams = BTreeMap<String, String>;

/// Message returned to the provider for every accepted notification.
pub const SUCCESS_MESSAGE: &str = "Notificación procesada correctamente";

/// Strongly-typed notification identifier.
///
/// # Example
///
/// ```
/// use payhook_core::models::NotificationId;
/// let id = NotificationId::new();
/// println!("Stored notification {id}");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    /// Creates a new random notification ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for NotificationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Declared type of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// `type: "payment"`
    Payment,
    /// `type: "transfer"`
    Transfer,
    /// Any other declared type.
    Other,
    /// No type declared in payload or query.
    Unspecified,
}

impl NotificationKind {
    /// Classifies a notification by its `type` field.
    ///
    /// Falls back to the `type` or `topic` query parameter, which some
    /// providers send instead of a body field.
    pub fn classify(payload: &Value, query: &QueryParams) -> Self {
        let declared = payload
            .get("type")
            .and_then(Value::as_str)
            .or_else(|| query.get("type").map(String::as_str))
            .or_else(|| query.get("topic").map(String::as_str));

        match declared {
            Some("payment") => Self::Payment,
            Some("transfer") => Self::Transfer,
            Some(_) => Self::Other,
            None => Self::Unspecified,
        }
    }

    /// Lower-case name used in logs and rendering.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Transfer => "transfer",
            Self::Other => "other",
            Self::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracts the provider's identifier for the notified resource.
///
/// Looks at `data.id`, then `id`, then the `data.id` and `id` query
/// parameters. Numeric ids are rendered as strings.
pub fn resource_reference(payload: &Value, query: &QueryParams) -> Option<String> {
    let from_payload = payload
        .get("data")
        .and_then(|data| data.get("id"))
        .or_else(|| payload.get("id"))
        .and_then(scalar_to_string);

    from_payload
        .or_else(|| query.get("data.id").cloned())
        .or_else(|| query.get("id").cloned())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A stored webhook notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Unique identifier assigned at ingestion
    pub id: NotificationId,
    /// When the notification was accepted
    pub received_at: DateTime<Utc>,
    /// Classification derived from the payload
    pub kind: NotificationKind,
    /// Provider identifier of the notified resource, if any
    pub reference: Option<String>,
    /// Parsed notification body
    pub payload: Value,
    /// Request headers at ingestion time
    pub headers: Headers,
    /// Query-string parameters at ingestion time
    pub query: QueryParams,
}

impl NotificationRecord {
    /// Creates a record, deriving kind and reference from the payload.
    pub fn new(
        received_at: DateTime<Utc>,
        payload: Value,
        headers: Headers,
        query: QueryParams,
    ) -> Self {
        let kind = NotificationKind::classify(&payload, &query);
        let reference = resource_reference(&payload, &query);

        Self { id: NotificationId::new(), received_at, kind, reference, payload, headers, query }
    }
}

/// Acknowledgement returned for an accepted notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Always `"success"`
    pub status: String,
    /// Human-readable confirmation
    pub message: String,
}

impl Acknowledgement {
    /// The acknowledgement sent for every accepted notification.
    pub fn success() -> Self {
        Self { status: "success".to_string(), message: SUCCESS_MESSAGE.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn query(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn classifies_declared_types() {
        let classify = |payload: Value| NotificationKind::classify(&payload, &QueryParams::new());

        assert_eq!(classify(json!({"type": "payment"})), NotificationKind::Payment);
        assert_eq!(classify(json!({"type": "transfer"})), NotificationKind::Transfer);
        assert_eq!(classify(json!({"type": "refund"})), NotificationKind::Other);
        assert_eq!(classify(json!({"amount": 5})), NotificationKind::Unspecified);
    }

    #[test]
    fn non_string_type_is_unspecified() {
        let kind = NotificationKind::classify(&json!({"type": 7}), &QueryParams::new());
        assert_eq!(kind, NotificationKind::Unspecified);
    }

    #[test]
    fn query_topic_used_when_body_has_no_type() {
        let kind =
            NotificationKind::classify(&json!({"action": "x"}), &query(&[("topic", "payment")]));
        assert_eq!(kind, NotificationKind::Payment);

        let kind = NotificationKind::classify(
            &json!({"type": "transfer"}),
            &query(&[("type", "payment")]),
        );
        assert_eq!(kind, NotificationKind::Transfer, "body type wins over query");
    }

    #[test]
    fn reference_prefers_nested_data_id() {
        let payload = json!({"id": "outer", "data": {"id": "12345"}});
        assert_eq!(resource_reference(&payload, &QueryParams::new()).as_deref(), Some("12345"));
    }

    #[test]
    fn reference_renders_numeric_ids() {
        let payload = json!({"data": {"id": 987}});
        assert_eq!(resource_reference(&payload, &QueryParams::new()).as_deref(), Some("987"));
    }

    #[test]
    fn reference_falls_back_to_query() {
        let payload = json!({"action": "payment.created"});
        let params = query(&[("data.id", "555")]);
        assert_eq!(resource_reference(&payload, &params).as_deref(), Some("555"));

        assert_eq!(resource_reference(&payload, &QueryParams::new()), None);
    }

    #[test]
    fn acknowledgement_message() {
        let ack = Acknowledgement::success();
        assert_eq!(ack.status, "success");
        assert_eq!(ack.message, "Notificación procesada correctamente");
    }
}
