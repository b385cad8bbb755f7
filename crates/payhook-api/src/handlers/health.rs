//! Service information and liveness handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::AppState;

const SERVICE_NAME: &str = "payhook";

/// Response for `GET /`.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    /// Service name
    pub service: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Always `"running"` while the process serves requests
    pub status: &'static str,
    /// Notifications currently retained
    pub notifications: usize,
    /// Maximum notifications retained
    pub capacity: usize,
    /// Whether signatures are required
    pub signature_verification: bool,
    /// Seconds since startup
    pub uptime_seconds: u64,
    /// Available endpoints
    pub endpoints: [&'static str; 4],
}

/// Liveness response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    /// Always `"alive"`
    pub status: &'static str,
    /// Time of the check
    pub timestamp: DateTime<Utc>,
    /// Service name
    pub service: &'static str,
}

/// Describes the running service.
#[instrument(name = "service_info", skip(state))]
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        notifications: state.ingestor.len(),
        capacity: state.ingestor.capacity(),
        signature_verification: state.ingestor.verification_enabled(),
        uptime_seconds: state.uptime().as_secs(),
        endpoints: ["POST /webhook", "GET /webhook/view", "GET /webhook/history", "GET /health"],
    })
}

/// Liveness check for orchestration probes.
///
/// Does not touch the history, only proves the server answers.
#[instrument(name = "liveness_check", skip(state))]
pub async fn liveness_check(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Performing liveness check");

    let response = LivenessResponse {
        status: "alive",
        timestamp: state.clock.now_utc(),
        service: SERVICE_NAME,
    };

    (StatusCode::OK, Json(response))
}
