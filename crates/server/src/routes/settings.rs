//! Settings route handlers.

use axum::Json;
use axum::extract::State;

use bijoux_core::{SettingsPatch, StoreSettings};

use crate::error::Result;
use crate::state::AppState;

/// Fetch the settings singleton.
pub async fn show(State(state): State<AppState>) -> Result<Json<StoreSettings>> {
    Ok(Json(state.store().get_settings().await?))
}

/// Shallow-merge a partial update over the settings singleton.
///
/// The delivery zone list is replaced wholesale when present, never
/// deep-merged.
pub async fn update(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<StoreSettings>> {
    Ok(Json(state.store().update_settings(patch).await?))
}
