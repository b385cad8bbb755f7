//! Payhook webhook receiver.
//!
//! Main entry point. Loads configuration, initializes tracing and serves
//! the webhook API until a shutdown signal arrives.

use anyhow::{Context, Result};
use payhook_api::{AppState, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_tracing(&config.rust_log);

    info!("Starting payhook webhook receiver");
    info!(
        host = %config.host,
        port = config.port,
        history_capacity = config.history_capacity,
        max_payload_bytes = config.max_payload_bytes,
        signature_verification = config.signature_verification,
        signature_header = %config.signature_header,
        "Configuration loaded"
    );

    let addr = config.parse_server_addr()?;
    let state = AppState::from_config(&config)?;

    if !state.ingestor.verification_enabled() {
        info!("Signature verification disabled, all well-formed notifications are accepted");
    }

    info!(addr = %addr, "Payhook is ready to receive webhooks");

    payhook_api::start_server(state, addr).await.context("HTTP server failed")?;

    info!("Payhook shutdown complete");
    Ok(())
}

/// Initializes tracing, preferring `RUST_LOG` from the environment.
fn init_tracing(default_directives: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(format!("{default_directives},payhook=debug,tower_http=debug"))
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
