//! Key-Value Front Door
//!
//! HTTP front door for item create/read operations backed by an external
//! managed key-value table service. Each request performs a single
//! pass-through call to the table API; there is no caching and no retry.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod store;

use store::KeyValueStore;

/// Shared request state: one long-lived store client handle, injected at
/// startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
}

/// Build the service router with method-specific route registration.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/item",
            post(handlers::create_item).get(handlers::get_item),
        )
        .route("/healthcheck", get(handlers::healthcheck))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
