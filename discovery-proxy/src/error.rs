//! Proxy error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::registry::ResolveError;

/// Errors surfaced to HTTP callers by the proxy. Downstream non-200
/// statuses are relayed verbatim; everything else maps to 400 or 500.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Required `id` query parameter was missing or empty.
    #[error("Missing 'id' query parameter")]
    MissingParameter,

    /// The registry lookup failed or produced no usable endpoint.
    #[error("Could not fetch service endpoint: {0}")]
    Discovery(#[from] ResolveError),

    /// The downstream request could not be delivered at all.
    #[error("Failed to fetch item: {0}")]
    UpstreamUnreachable(String),

    /// The downstream service answered with a non-200 status.
    #[error("Service returned status: {}", .0.as_u16())]
    UpstreamStatus(StatusCode),

    /// The downstream body did not decode into the expected Item shape.
    #[error("Failed to decode item response: {0}")]
    MalformedUpstream(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::MissingParameter => StatusCode::BAD_REQUEST,
            ProxyError::Discovery(_)
            | ProxyError::UpstreamUnreachable(_)
            | ProxyError::MalformedUpstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // passthrough of whatever the downstream answered
            ProxyError::UpstreamStatus(code) => *code,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
