//! Category route handlers.
//!
//! Categories are seed-only: this layer exposes no create, update, or
//! delete for them.

use axum::Json;
use axum::extract::State;

use bijoux_core::Category;

use crate::error::Result;
use crate::state::AppState;

/// List all categories.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.store().list_categories().await?))
}
