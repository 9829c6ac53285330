//! Application state shared across handlers.

use std::sync::Arc;

use crate::assets::Assets;
use crate::store::Store;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The storage backend handle is written once
/// at startup and read-only thereafter - there is no ambient global state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Store,
    assets: Assets,
}

impl AppState {
    /// Create a new application state around the selected backend.
    #[must_use]
    pub fn new(store: Store, assets: Assets) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, assets }),
        }
    }

    /// Get a reference to the active storage backend.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get a reference to the uploads directory handle.
    #[must_use]
    pub fn assets(&self) -> &Assets {
        &self.inner.assets
    }
}
