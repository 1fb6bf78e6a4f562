use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use smartroute_server::{AppState, Cli, ServerConfig, build_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(&cli)?;
    info!(
        "Serving places from {} ({} explicit extracts)",
        config.data_dir.display(),
        config.places.len()
    );

    let state = Arc::new(AppState::from_config(&config));
    preload(&state, &config.preload).await;

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("binding {}", config.bind_address()))?;
    info!("SmartRoute listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Builds the configured places up front; failures are logged and retried on demand
async fn preload(state: &Arc<AppState>, places: &[String]) {
    for place in places {
        let shared = Arc::clone(state);
        let name = place.clone();
        match tokio::task::spawn_blocking(move || shared.cache.get_or_load(&name)).await {
            Ok(Ok(network)) => info!(
                "Preloaded '{place}': {} nodes, {} edges",
                network.node_count(),
                network.edge_count()
            ),
            Ok(Err(error)) => warn!("Could not preload '{place}': {error}"),
            Err(error) => warn!("Preloading '{place}' panicked: {error}"),
        }
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {error}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
