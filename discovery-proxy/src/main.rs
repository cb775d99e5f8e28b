//! Discovery Proxy entry point

use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use item_discovery_proxy::registry::HttpServiceRegistry;
use item_discovery_proxy::{router, AppState, NAMESPACE};

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .json()
        .init();

    info!("Starting Discovery Proxy");

    let region = env::var("REGION").unwrap_or_else(|_| "local".to_string());
    info!("Region: {}", region);

    let service_name = env::var("SERVICE_NAME").context("SERVICE_NAME is required")?;
    info!("Resolving service '{}' in namespace '{}'", service_name, NAMESPACE);

    let registry = HttpServiceRegistry::from_env()?;
    let http_client = reqwest::Client::builder()
        .build()
        .context("Failed to create HTTP client")?;

    let state = AppState {
        registry: Arc::new(registry),
        http_client,
        service_name,
    };

    let app = router(state);

    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Discovery proxy listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
