//! Payhook HTTP API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod render;
pub mod server;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use payhook_core::{Clock, Ingestor, RealClock};

pub use config::Config;
pub use server::{create_router, start_server};

use crate::render::HistoryRenderer;

/// Request limits enforced by the router middleware.
#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Largest accepted request body in bytes
    pub max_payload_bytes: usize,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self { request_timeout: Duration::from_secs(30), max_payload_bytes: 10 * 1024 * 1024 }
    }
}

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Notification ingestor owning the history
    pub ingestor: Arc<Ingestor>,
    /// Time source for uptime and timestamps
    pub clock: Arc<dyn Clock>,
    /// HTML renderer for the history page
    pub renderer: Arc<HistoryRenderer>,
    /// Request limits
    pub limits: HttpLimits,
    started_at: std::time::Instant,
}

impl AppState {
    /// Creates state around an existing ingestor.
    ///
    /// # Errors
    ///
    /// Fails if the embedded HTML template does not compile.
    pub fn new(ingestor: Arc<Ingestor>, clock: Arc<dyn Clock>, limits: HttpLimits) -> Result<Self> {
        let renderer = HistoryRenderer::new().context("Failed to compile history template")?;
        let started_at = clock.now();
        Ok(Self { ingestor, clock, renderer: Arc::new(renderer), limits, started_at })
    }

    /// Builds production state from configuration.
    ///
    /// # Errors
    ///
    /// Fails on an invalid signature configuration or template.
    pub fn from_config(config: &Config) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(RealClock::new());
        let ingestor = Ingestor::new(
            config.history_capacity,
            config.signature_policy()?,
            Arc::clone(&clock),
        );
        let limits = HttpLimits {
            request_timeout: config.request_timeout(),
            max_payload_bytes: config.max_payload_bytes,
        };

        Self::new(Arc::new(ingestor), clock, limits)
    }

    /// Time since the state was created.
    pub fn uptime(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.started_at)
    }
}
