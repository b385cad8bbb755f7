//! Read-only views of the notification history.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Json,
};
use payhook_core::{NotificationRecord, PayhookError};
use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::{handlers::create_error_response, render::HistoryView, AppState};

/// JSON projection of the history.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Maximum number of notifications retained
    pub capacity: usize,
    /// Number of notifications returned
    pub count: usize,
    /// Stored notifications, newest first
    pub notifications: Vec<NotificationRecord>,
}

/// Renders the history as an HTML page.
#[instrument(name = "view_history", skip(state))]
pub async fn view_history(State(state): State<AppState>) -> Response {
    let records = state.ingestor.list_history();
    let view = HistoryView::new(
        &records,
        state.ingestor.capacity(),
        state.ingestor.verification_enabled(),
    );

    match state.renderer.render(&view) {
        Ok(html) => {
            debug!(count = records.len(), "Rendered history page");
            Html(html).into_response()
        },
        Err(e) => {
            error!(error = %e, "Failed to render history page");
            create_error_response(&PayhookError::Internal(format!("failed to render history: {e}")))
        },
    }
}

/// Returns the history as JSON.
#[instrument(name = "list_history", skip(state))]
pub async fn list_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let notifications = state.ingestor.list_history();

    Json(HistoryResponse {
        capacity: state.ingestor.capacity(),
        count: notifications.len(),
        notifications,
    })
}
