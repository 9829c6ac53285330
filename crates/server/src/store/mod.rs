//! The persistence layer: one facade, two interchangeable backends.
//!
//! [`Store::connect`] picks a backend exactly once at process start: the
//! document backend when a MongoDB URL is configured and reachable, the
//! file backend otherwise. After that the facade exposes identical
//! read/write semantics either way - callers never branch on backend type.
//!
//! Merge semantics for partial updates live in `bijoux-core` and are shared
//! by both backends; this module only decides where records durably live.

pub mod document;
pub mod file;

use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;

use bijoux_core::{
    Category, Order, OrderPatch, Product, ProductDraft, ProductPatch, SettingsPatch, StoreSettings,
};

use crate::config::Config;
use document::DocumentStore;
use file::FileStore;

/// Startup-only bound on the MongoDB connection attempt.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Error type for persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier has no matching record.
    #[error("record not found")]
    NotFound,

    /// A required field is missing or invalid.
    #[error("validation error: {0}")]
    Validation(String),

    /// The document store became unreachable after startup.
    #[error("document store error: {0}")]
    Unavailable(#[from] mongodb::error::Error),

    /// File backend I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized for storage.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A patch could not be encoded as a document-store update.
    #[error("document encoding error: {0}")]
    Encoding(#[from] mongodb::bson::ser::Error),
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Lossless on every supported platform; counts come from `Vec::len`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn count(n: usize) -> u64 {
    n as u64
}

/// Dashboard aggregation over the four entity listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub products_count: u64,
    pub orders_count: u64,
    pub categories_count: u64,
    /// Orders whose status is exactly `"pending"`.
    pub pending_orders_count: u64,
}

/// The active storage backend, selected once at startup.
///
/// Held immutably by the application state for the process lifetime; there
/// is no runtime re-selection or reconnection.
pub enum Store {
    File(FileStore),
    Document(DocumentStore),
}

impl Store {
    /// Select and initialize a backend.
    ///
    /// With no configured MongoDB URL the file backend is chosen
    /// immediately. Otherwise a connection is attempted with a bounded
    /// timeout; failure is the designed trigger for file-backend fallback
    /// and is logged, never raised.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file backend cannot initialize its
    /// storage directory.
    pub async fn connect(config: &Config) -> Result<Self> {
        if let Some(url) = &config.mongodb_url {
            match DocumentStore::connect(url.expose_secret(), CONNECT_TIMEOUT).await {
                Ok(store) => {
                    tracing::info!("document backend active");
                    return Ok(Self::Document(store));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "document store unreachable, falling back to file backend");
                }
            }
        } else {
            tracing::info!("no MongoDB URL configured, using file backend");
        }

        let store = FileStore::open(&config.data_dir).await?;
        tracing::info!(data_dir = %config.data_dir.display(), "file backend active");
        Ok(Self::File(store))
    }

    /// List products, optionally filtered by exact status equality.
    ///
    /// Ordering is backend-defined; callers must not rely on it.
    pub async fn list_products(&self, status: Option<&str>) -> Result<Vec<Product>> {
        match self {
            Self::File(store) => store.list_products(status).await,
            Self::Document(store) => store.list_products(status).await,
        }
    }

    /// Fetch a single product by identifier.
    pub async fn get_product(&self, id: &str) -> Result<Product> {
        match self {
            Self::File(store) => store.get_product(id).await,
            Self::Document(store) => store.get_product(id).await,
        }
    }

    /// Create a product from a draft.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when both name and title are
    /// empty - a product must be nameable.
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product> {
        if draft.name.is_empty() && draft.title.is_empty() {
            return Err(StoreError::Validation(
                "product name is required".to_string(),
            ));
        }
        let product = Product::from_draft(draft);
        match self {
            Self::File(store) => store.insert_product(product).await,
            Self::Document(store) => store.insert_product(product).await,
        }
    }

    /// Shallow-merge a patch over a stored product.
    pub async fn update_product(&self, id: &str, patch: ProductPatch) -> Result<Product> {
        match self {
            Self::File(store) => store.update_product(id, patch).await,
            Self::Document(store) => store.update_product(id, patch).await,
        }
    }

    /// Remove a product, returning the removed record.
    ///
    /// The caller is responsible for deleting the image files the returned
    /// record references (record-then-files order): the record removal is
    /// durable even if file cleanup later fails.
    pub async fn delete_product(&self, id: &str) -> Result<Product> {
        match self {
            Self::File(store) => store.delete_product(id).await,
            Self::Document(store) => store.delete_product(id).await,
        }
    }

    /// List all categories. Categories are seed-only; no writes exist.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        match self {
            Self::File(store) => store.list_categories().await,
            Self::Document(store) => store.list_categories().await,
        }
    }

    /// Fetch the settings singleton, seeded with defaults if absent.
    pub async fn get_settings(&self) -> Result<StoreSettings> {
        match self {
            Self::File(store) => store.get_settings().await,
            Self::Document(store) => store.get_settings().await,
        }
    }

    /// Shallow-merge a patch over the settings singleton and persist it.
    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<StoreSettings> {
        match self {
            Self::File(store) => store.update_settings(patch).await,
            Self::Document(store) => store.update_settings(patch).await,
        }
    }

    /// List all orders, newest first.
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        let mut orders = match self {
            Self::File(store) => store.list_orders().await?,
            Self::Document(store) => store.list_orders().await?,
        };
        // The one defined ordering in the layer: descending creation time.
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Create a pending order from caller-supplied fields.
    pub async fn create_order(&self, fields: serde_json::Map<String, serde_json::Value>) -> Result<Order> {
        let order = Order::new(fields);
        match self {
            Self::File(store) => store.insert_order(order).await,
            Self::Document(store) => store.insert_order(order).await,
        }
    }

    /// Shallow-merge a patch over a stored order.
    pub async fn update_order(&self, id: &str, patch: OrderPatch) -> Result<Order> {
        match self {
            Self::File(store) => store.update_order(id, patch).await,
            Self::Document(store) => store.update_order(id, patch).await,
        }
    }

    /// Remove an order.
    pub async fn delete_order(&self, id: &str) -> Result<()> {
        match self {
            Self::File(store) => store.delete_order(id).await,
            Self::Document(store) => store.delete_order(id).await,
        }
    }

    /// Aggregate counts for the admin dashboard.
    pub async fn stats(&self) -> Result<Stats> {
        match self {
            Self::File(store) => store.stats().await,
            Self::Document(store) => store.stats().await,
        }
    }

    /// Name of the active backend, for logging.
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Document(_) => "document",
        }
    }
}
