//! HTML rendering of the notification history.
//!
//! A read-only projection of `Ingestor::list_history`. The template is
//! compiled once at startup; handlebars escapes every interpolated value.

use std::{collections::BTreeMap, fmt};

use handlebars::{Handlebars, RenderError, TemplateError};
use payhook_core::NotificationRecord;
use serde::Serialize;

const HISTORY_TEMPLATE_NAME: &str = "history";
const HISTORY_TEMPLATE: &str = include_str!("../templates/history.hbs");

/// Seconds between automatic reloads of the history page.
pub const REFRESH_SECONDS: u64 = 15;

/// Data passed to the history template.
#[derive(Debug, Serialize)]
pub struct HistoryView {
    capacity: usize,
    count: usize,
    signature_verification: bool,
    refresh_seconds: u64,
    notifications: Vec<NotificationView>,
}

impl HistoryView {
    /// Builds the view from a history snapshot.
    pub fn new(
        records: &[NotificationRecord],
        capacity: usize,
        signature_verification: bool,
    ) -> Self {
        Self {
            capacity,
            count: records.len(),
            signature_verification,
            refresh_seconds: REFRESH_SECONDS,
            notifications: records.iter().map(NotificationView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct NotificationView {
    id: String,
    received_at: String,
    kind: &'static str,
    reference: Option<String>,
    payload: String,
    headers: Vec<NameValue>,
    query: Vec<NameValue>,
}

#[derive(Debug, Serialize)]
struct NameValue {
    name: String,
    value: String,
}

impl From<&NotificationRecord> for NotificationView {
    fn from(record: &NotificationRecord) -> Self {
        Self {
            id: record.id.to_string(),
            received_at: record.received_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            kind: record.kind.as_str(),
            reference: record.reference.clone(),
            payload: serde_json::to_string_pretty(&record.payload)
                .unwrap_or_else(|_| record.payload.to_string()),
            headers: name_values(&record.headers),
            query: name_values(&record.query),
        }
    }
}

fn name_values(map: &BTreeMap<String, String>) -> Vec<NameValue> {
    map.iter().map(|(name, value)| NameValue { name: name.clone(), value: value.clone() }).collect()
}

/// Compiled history page template.
pub struct HistoryRenderer {
    registry: Handlebars<'static>,
}

impl HistoryRenderer {
    /// Compiles the embedded template.
    ///
    /// # Errors
    ///
    /// Returns the template syntax error, if any.
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(HISTORY_TEMPLATE_NAME, HISTORY_TEMPLATE)?;
        Ok(Self { registry })
    }

    /// Renders the history page.
    ///
    /// # Errors
    ///
    /// Returns the handlebars render error, if any.
    pub fn render(&self, view: &HistoryView) -> Result<String, RenderError> {
        self.registry.render(HISTORY_TEMPLATE_NAME, view)
    }
}

impl fmt::Debug for HistoryRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryRenderer").field("template", &HISTORY_TEMPLATE_NAME).finish()
    }
}
