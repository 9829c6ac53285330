//! Dashboard stats handler.

use axum::Json;
use axum::extract::State;

use crate::error::Result;
use crate::state::AppState;
use crate::store::Stats;

/// Aggregate counts over the four entity listings.
pub async fn show(State(state): State<AppState>) -> Result<Json<Stats>> {
    Ok(Json(state.store().stats().await?))
}
