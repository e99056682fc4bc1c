//! Log Relay
//!
//! Binary entrypoint: read configuration from the environment, wire the
//! HTTP sink and filesystem dead-letter store, and serve the API.

use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use log_relay::api::{create_router, AppState};
use log_relay::config::ServiceConfig;
use log_relay::dlq::{DeadLetterStore, FsBlobStore};
use log_relay::sink::HttpSink;
use log_relay::VERSION;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from_env().context("loading configuration")?;
    info!("Log Relay v{}", VERSION);
    info!(bind_addr = %config.bind_addr, sink_url = %config.sink.url, "configured");

    let sink = Arc::new(HttpSink::new(&config.sink).context("building sink client")?);
    let blob = Arc::new(
        FsBlobStore::new(&config.dlq.dir)
            .await
            .context("opening dead-letter store")?,
    );
    let dlq = Arc::new(DeadLetterStore::new(blob, config.dlq.prefix.clone()));

    let state = AppState::new(
        config.auth.secret.as_str(),
        sink,
        dlq,
        config.replay_max_batch,
    );
    let router = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    info!("shutdown signal received");
}
