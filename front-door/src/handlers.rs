//! HTTP handlers for the item create/read surface
//!
//! Every handler performs at most one call to the table service and maps
//! the outcome straight onto an HTTP status.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::error::ApiError;
use crate::store::Item;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    #[serde(default)]
    pub id: String,
}

/// POST /item - write one item, overwriting any existing record.
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<Item>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(item) = payload.map_err(|_| ApiError::MalformedInput)?;

    state.store.put(&item).await.map_err(|e| {
        error!("Failed to put item {}: {:#}", item.id, e);
        ApiError::Store(format!("Failed to put item: {:#}", e))
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Item created" })),
    ))
}

/// GET /item?id= - point lookup by id.
pub async fn get_item(
    State(state): State<AppState>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Item>, ApiError> {
    if query.id.is_empty() {
        return Err(ApiError::MissingParameter);
    }

    let item = state
        .store
        .get(&query.id)
        .await
        .map_err(|e| {
            error!("Failed to get item {}: {:#}", query.id, e);
            ApiError::Store(format!("Failed to get item: {:#}", e))
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(item))
}

/// GET /healthcheck - probes the table service with a describe call.
pub async fn healthcheck(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.describe().await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            warn!("Table describe probe failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "unhealthy", "error": format!("{:#}", e) })),
            )
        }
    }
}
