//! File-based JSON backend.
//!
//! One JSON tree per logical area: `products.json` holds products,
//! categories and the settings singleton together; `orders.json` is a bare
//! array of orders. Every write is read-whole-tree, mutate in memory,
//! write-whole-tree - there is no log and no partial write. Two guarantees
//! make that survivable:
//!
//! - all read-modify-write cycles are serialized through one async mutex,
//!   so concurrent requests cannot silently drop each other's updates;
//! - files are written to a temp path and renamed into place, so a crash
//!   mid-write leaves the previous tree intact.
//!
//! An unparseable tree is treated as an empty store: reads log a warning
//! and substitute the seeded default state. Corruption is never fatal.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use bijoux_core::{
    Category, Order, OrderPatch, Product, ProductPatch, SettingsPatch, StoreSettings,
};

use super::{Result, Stats, StoreError, count};

const CATALOG_FILE: &str = "products.json";
const ORDERS_FILE: &str = "orders.json";

/// The combined catalog tree persisted in `products.json`.
///
/// Field-level defaults mean a partial tree (hand-edited, or from an older
/// deployment) deserializes with the missing areas seeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogTree {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default = "Category::defaults")]
    categories: Vec<Category>,
    #[serde(default)]
    settings: StoreSettings,
}

impl Default for CatalogTree {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            categories: Category::defaults(),
            settings: StoreSettings::default(),
        }
    }
}

/// File-backend adapter.
pub struct FileStore {
    catalog_path: PathBuf,
    orders_path: PathBuf,
    /// Serializes every read-modify-write cycle across both files.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the store rooted at `data_dir`, creating and seeding the
    /// catalog file on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the seeded catalog file cannot
    /// be created.
    pub async fn open(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let store = Self {
            catalog_path: data_dir.join(CATALOG_FILE),
            orders_path: data_dir.join(ORDERS_FILE),
            write_lock: Mutex::new(()),
        };

        if !tokio::fs::try_exists(&store.catalog_path).await? {
            store.write_catalog(&CatalogTree::default()).await?;
            tracing::info!(path = %store.catalog_path.display(), "catalog file seeded");
        }

        Ok(store)
    }

    pub async fn list_products(&self, status: Option<&str>) -> Result<Vec<Product>> {
        let tree = self.read_catalog().await;
        let products = match status {
            Some(status) => tree
                .products
                .into_iter()
                .filter(|p| p.status.as_str() == status)
                .collect(),
            None => tree.products,
        };
        Ok(products)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.read_catalog()
            .await
            .products
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)
    }

    pub async fn insert_product(&self, product: Product) -> Result<Product> {
        let _guard = self.write_lock.lock().await;
        let mut tree = self.read_catalog().await;
        tree.products.push(product.clone());
        self.write_catalog(&tree).await?;
        Ok(product)
    }

    pub async fn update_product(&self, id: &str, patch: ProductPatch) -> Result<Product> {
        let _guard = self.write_lock.lock().await;
        let mut tree = self.read_catalog().await;
        let product = tree
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        product.apply(patch);
        let updated = product.clone();
        self.write_catalog(&tree).await?;
        Ok(updated)
    }

    pub async fn delete_product(&self, id: &str) -> Result<Product> {
        let _guard = self.write_lock.lock().await;
        let mut tree = self.read_catalog().await;
        let index = tree
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        let removed = tree.products.remove(index);
        self.write_catalog(&tree).await?;
        Ok(removed)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.read_catalog().await.categories)
    }

    pub async fn get_settings(&self) -> Result<StoreSettings> {
        Ok(self.read_catalog().await.settings)
    }

    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<StoreSettings> {
        let _guard = self.write_lock.lock().await;
        let mut tree = self.read_catalog().await;
        tree.settings.apply(patch);
        let updated = tree.settings.clone();
        self.write_catalog(&tree).await?;
        Ok(updated)
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        Ok(self.read_orders().await)
    }

    pub async fn insert_order(&self, order: Order) -> Result<Order> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.read_orders().await;
        orders.push(order.clone());
        self.write_orders(&orders).await?;
        Ok(order)
    }

    pub async fn update_order(&self, id: &str, patch: OrderPatch) -> Result<Order> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.read_orders().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        order.apply(patch);
        let updated = order.clone();
        self.write_orders(&orders).await?;
        Ok(updated)
    }

    pub async fn delete_order(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.read_orders().await;
        let index = orders
            .iter()
            .position(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        orders.remove(index);
        self.write_orders(&orders).await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<Stats> {
        let tree = self.read_catalog().await;
        let orders = self.read_orders().await;
        Ok(Stats {
            products_count: count(tree.products.len()),
            orders_count: count(orders.len()),
            categories_count: count(tree.categories.len()),
            pending_orders_count: count(
                orders
                    .iter()
                    .filter(|o| o.status == bijoux_core::order::PENDING)
                    .count(),
            ),
        })
    }

    /// Read the catalog tree, substituting the seeded default state when
    /// the file is missing or unparseable.
    async fn read_catalog(&self) -> CatalogTree {
        match tokio::fs::read(&self.catalog_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                tracing::warn!(
                    path = %self.catalog_path.display(),
                    error = %err,
                    "catalog file unparseable, treating store as empty"
                );
                CatalogTree::default()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => CatalogTree::default(),
            Err(err) => {
                tracing::warn!(
                    path = %self.catalog_path.display(),
                    error = %err,
                    "catalog file unreadable, treating store as empty"
                );
                CatalogTree::default()
            }
        }
    }

    async fn write_catalog(&self, tree: &CatalogTree) -> Result<()> {
        write_atomic(&self.catalog_path, &serde_json::to_vec_pretty(tree)?).await
    }

    /// Read the orders array; a missing file is an empty order book.
    async fn read_orders(&self) -> Vec<Order> {
        match tokio::fs::read(&self.orders_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                tracing::warn!(
                    path = %self.orders_path.display(),
                    error = %err,
                    "orders file unparseable, treating order book as empty"
                );
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }

    async fn write_orders(&self, orders: &[Order]) -> Result<()> {
        write_atomic(&self.orders_path, &serde_json::to_vec_pretty(orders)?).await
    }
}

/// Write via temp file and rename so readers never observe a truncated
/// tree.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bijoux_core::ProductDraft;

    use super::*;

    #[tokio::test]
    async fn open_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        let categories = store.list_categories().await.unwrap();
        assert_eq!(categories.len(), 6);

        let settings = store.get_settings().await.unwrap();
        assert!(!settings.store_name.is_empty());
    }

    #[tokio::test]
    async fn corrupt_catalog_reads_as_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        let product = Product::from_draft(ProductDraft {
            name: "Ring".to_string(),
            ..ProductDraft::default()
        });
        store.insert_product(product).await.unwrap();

        tokio::fs::write(dir.path().join(CATALOG_FILE), b"{ not json")
            .await
            .unwrap();

        // Corruption recovers to the default state instead of failing.
        let products = store.list_products(None).await.unwrap();
        assert!(products.is_empty());
        assert_eq!(store.list_categories().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn missing_orders_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert!(store.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn writes_replace_the_tree_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        let product = Product::from_draft(ProductDraft {
            name: "Ring".to_string(),
            ..ProductDraft::default()
        });
        let id = store.insert_product(product).await.unwrap().id;

        // No temp file left behind after a completed write.
        assert!(
            !dir.path().join("products.json.tmp").exists(),
            "temp file should be renamed away"
        );
        assert_eq!(store.get_product(&id).await.unwrap().id, id);
    }
}
