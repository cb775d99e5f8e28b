//! Key-Value Front Door entry point

use anyhow::Result;
use std::env;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use item_front_door::store::HttpTableStore;
use item_front_door::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .json()
        .init();

    info!("Starting Key-Value Front Door");

    let region = env::var("REGION").unwrap_or_else(|_| "local".to_string());
    info!("Region: {}", region);

    let store = HttpTableStore::from_env()?;
    let state = AppState {
        store: Arc::new(store),
    };

    let app = router(state);

    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Front door listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
