//! HTTP handlers for the discovery proxy
//!
//! `/fetch-item` resolves the configured service name through the
//! registry, issues one GET against the resolved endpoint and relays the
//! result. `/healthcheck` is a static liveness answer and probes nothing.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::ProxyError;
use crate::registry::resolve_endpoint;
use crate::{AppState, NAMESPACE};

/// Item shape relayed from the downstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    #[serde(default)]
    pub id: String,
}

/// GET /fetch-item?id= - resolve the service and relay one item lookup.
pub async fn fetch_item(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> Result<Json<Item>, ProxyError> {
    if query.id.is_empty() {
        return Err(ProxyError::MissingParameter);
    }

    let endpoint = resolve_endpoint(state.registry.as_ref(), &state.service_name, NAMESPACE)
        .await
        .map_err(|e| {
            warn!("Endpoint resolution for {} failed: {}", state.service_name, e);
            ProxyError::Discovery(e)
        })?;

    let url = format!(
        "{}/item?id={}",
        endpoint.base_url(),
        urlencoding::encode(&query.id)
    );
    info!("Proxying item fetch to: {}", url);

    let response = state
        .http_client
        .get(&url)
        .send()
        .await
        .map_err(|e| ProxyError::UpstreamUnreachable(e.to_string()))?;

    if response.status() != StatusCode::OK {
        return Err(ProxyError::UpstreamStatus(response.status()));
    }

    // Decode into the expected shape instead of relaying bytes, so a
    // malformed downstream payload fails the request loudly.
    let item = response
        .json::<Item>()
        .await
        .map_err(|e| ProxyError::MalformedUpstream(e.to_string()))?;

    Ok(Json(item))
}

/// GET /healthcheck - static response, no registry or downstream probe.
pub async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}
