//! Order route handlers.
//!
//! Orders carry arbitrary caller-supplied JSON fields; this layer only
//! owns the identifier, status, and timestamps.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;

use bijoux_core::{Order, OrderPatch};

use crate::error::Result;
use crate::state::AppState;

/// List all orders, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.store().list_orders().await?))
}

/// Create a pending order.
pub async fn create(
    State(state): State<AppState>,
    Json(fields): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = state.store().create_order(fields).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Shallow-merge an update over a stored order.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<Order>> {
    Ok(Json(state.store().update_order(&id, patch).await?))
}

/// Delete an order.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state.store().delete_order(&id).await?;
    Ok(Json(json!({"success": true})))
}
