//! Discovery Proxy
//!
//! HTTP service that resolves a configured logical service name to a live
//! network endpoint via an external registry, then relays a single item
//! lookup to that endpoint. Resolution happens once per request; resolved
//! endpoints are never cached and failed calls are never retried.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod registry;

use registry::ServiceRegistry;

/// Namespace the service name is resolved in. Fixed for this deployment.
pub const NAMESPACE: &str = "dev";

/// Shared request state: registry client handle, outbound HTTP client and
/// the logical service name to resolve, all established at startup.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn ServiceRegistry>,
    pub http_client: reqwest::Client,
    pub service_name: String,
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/fetch-item", get(handlers::fetch_item))
        .route("/healthcheck", get(handlers::healthcheck))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
