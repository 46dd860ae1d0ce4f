use std::sync::Arc;

use anyhow::Context;
use reroute::api::{self, AppState};
use reroute::config::{NetworkConfig, ServerConfig};
use reroute::{reference, RoutingEngine};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    tracing_subscriber::fmt().with_max_level(config.log_level).init();

    // 1. Load the network, built-in unless a file is configured
    let network = match &config.network_path {
        Some(path) => {
            info!("Loading network from {}", path.display());
            NetworkConfig::from_path(path)
                .with_context(|| format!("failed to read network file {}", path.display()))?
        }
        None => {
            info!("Using built-in Bangalore network");
            reference::bangalore().clone()
        }
    };
    let engine = RoutingEngine::from_config(&network).context("invalid network configuration")?;

    let shared_state = Arc::new(AppState { engine });

    // 2. Serve
    let app = api::router(shared_state);

    info!("API server running on http://{}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
