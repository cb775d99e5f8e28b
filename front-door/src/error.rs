//! API error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP callers by the front door. All of them are
/// terminal for the request; nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body could not be decoded into an Item.
    #[error("Invalid request payload")]
    MalformedInput,

    /// Required `id` query parameter was missing or empty.
    #[error("Missing 'id' query parameter")]
    MissingParameter,

    /// No record matched the requested id.
    #[error("Item not found")]
    NotFound,

    /// The table service call itself failed.
    #[error("{0}")]
    Store(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MalformedInput | ApiError::MissingParameter => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
