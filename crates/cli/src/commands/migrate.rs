//! File-to-MongoDB data migration.
//!
//! Reads the file backend's JSON trees through the same adapter the server
//! uses, then bulk-loads products and orders into MongoDB, replacing any
//! existing collection contents. Categories and settings are not copied:
//! the document backend seeds those itself on first connection.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use bijoux_server::store::document::DocumentStore;
use bijoux_server::store::file::FileStore;
use bijoux_server::store::StoreError;

/// Bound on the MongoDB connection attempt; migration is interactive, so
/// fail fast.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Error type for the migrate command.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("no MongoDB URL: pass --url or set BIJOUX_MONGODB_URL")]
    MissingUrl,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Copy products and orders from `data_dir` into MongoDB at `url`.
///
/// # Errors
///
/// Fails if no URL is available, the server is unreachable, or the bulk
/// load fails. The source files are never modified.
pub async fn run(data_dir: &Path, url: Option<String>) -> Result<(), MigrateError> {
    let url = url
        .or_else(|| std::env::var("BIJOUX_MONGODB_URL").ok())
        .ok_or(MigrateError::MissingUrl)?;

    let source = FileStore::open(data_dir).await?;
    let products = source.list_products(None).await?;
    let orders = source.list_orders().await?;

    tracing::info!(
        products = products.len(),
        orders = orders.len(),
        "read file backend"
    );

    let target = DocumentStore::connect(&url, CONNECT_TIMEOUT).await?;
    target.import(&products, &orders).await?;

    tracing::info!("migration complete, all data is now in MongoDB");
    Ok(())
}
