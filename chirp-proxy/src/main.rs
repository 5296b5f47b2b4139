//! chirp-proxy - music generation API proxy
//!
//! Forwards generation and lyrics requests to the upstream API, runs custom-mode
//! generations on a background worker pool, and serves task status from flat
//! JSON files.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chirp_proxy::config::{Cli, ProxyConfig};
use chirp_proxy::services::{AudioPoller, GenerationApi, TaskOrchestrator, UpstreamClient, UpstreamConfig};
use chirp_proxy::store::TaskStore;
use chirp_proxy::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting chirp-proxy");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = ProxyConfig::resolve(&cli)?;
    config.ensure_tasks_dir()?;

    let api: Arc<dyn GenerationApi> = Arc::new(UpstreamClient::new(UpstreamConfig::new(&config.base_url))?);
    let store = TaskStore::new(&config.tasks_dir);
    let orchestrator = TaskOrchestrator::start(store.clone(), Arc::clone(&api), config.workers);
    let poller = AudioPoller::new(Arc::clone(&api)).with_policy(config.poll_max_retries, config.poll_delay);

    let state = AppState::new(api, store, orchestrator.clone(), poller);
    let app = chirp_proxy::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, draining generation queue");
    orchestrator.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
