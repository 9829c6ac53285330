//! MongoDB document backend.
//!
//! Four collections (`products`, `categories`, `settings`, `orders`), all
//! keyed on the logical `id` field rather than Mongo's own `_id`. Filters
//! never go beyond single-field equality. Connectivity is established once
//! at startup with a bounded timeout; a connection lost afterwards surfaces
//! as [`StoreError::Unavailable`] - there is no reconnect logic.

use std::time::Duration;

use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{self, Document, doc};
use mongodb::options::{ClientOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};

use bijoux_core::{
    Category, Order, OrderPatch, Product, ProductPatch, SettingsPatch, StoreSettings,
};

use super::{Result, Stats, StoreError};

/// Database name used when the connection string names none.
const DEFAULT_DATABASE: &str = "bijoux";

/// Document-backend adapter.
pub struct DocumentStore {
    db: Database,
}

impl DocumentStore {
    /// Connect, ping, and run one-time initialization.
    ///
    /// The timeout bounds both the TCP connect and server selection, so a
    /// dead or absent MongoDB fails fast enough for startup fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the server is unreachable
    /// within the timeout, or initialization fails. The caller treats any
    /// of these as the trigger for file-backend fallback.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self> {
        let mut options = ClientOptions::parse(url).await?;
        // Connection-string options win; these are startup defaults.
        options.connect_timeout.get_or_insert(timeout);
        options.server_selection_timeout.get_or_insert(timeout);

        let client = Client::with_options(options)?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

        // Fail fast instead of discovering a dead server on first use.
        db.run_command(doc! {"ping": 1}).await?;

        let store = Self { db };
        store.init().await?;
        Ok(store)
    }

    /// One-time initialization: unique index on category ids, and default
    /// seeding for empty collections.
    async fn init(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! {"id": 1})
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.categories().create_index(index).await?;

        if self.categories().count_documents(doc! {}).await? == 0 {
            self.categories()
                .insert_many(Category::defaults())
                .await?;
            tracing::info!("categories collection seeded");
        }

        if self.settings().find_one(doc! {}).await?.is_none() {
            self.settings()
                .insert_one(StoreSettings::default())
                .await?;
            tracing::info!("settings singleton seeded");
        }

        Ok(())
    }

    pub async fn list_products(&self, status: Option<&str>) -> Result<Vec<Product>> {
        let filter = status.map_or_else(|| doc! {}, |status| doc! {"status": status});
        let cursor = self.products().find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.products()
            .find_one(doc! {"id": id})
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn insert_product(&self, product: Product) -> Result<Product> {
        self.products().insert_one(&product).await?;
        Ok(product)
    }

    /// Shallow-merge a patch as a single atomic `$set`.
    ///
    /// The merge happens inside the store rather than read-modify-write,
    /// so concurrent updates to the same product cannot clobber each
    /// other's fields, and a record deleted mid-update surfaces as
    /// [`StoreError::NotFound`] instead of a silent no-op.
    pub async fn update_product(&self, id: &str, patch: ProductPatch) -> Result<Product> {
        let update = product_update(&patch)?;
        self.products()
            .find_one_and_update(doc! {"id": id}, doc! {"$set": update})
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn delete_product(&self, id: &str) -> Result<Product> {
        self.products()
            .find_one_and_delete(doc! {"id": id})
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let cursor = self.categories().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn get_settings(&self) -> Result<StoreSettings> {
        Ok(self
            .settings()
            .find_one(doc! {})
            .await?
            .unwrap_or_default())
    }

    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<StoreSettings> {
        let update = settings_update(&patch)?;
        // Upsert keeps the singleton contract even if seeding never ran.
        self.settings()
            .find_one_and_update(doc! {}, doc! {"$set": update})
            .return_document(ReturnDocument::After)
            .upsert(true)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        let cursor = self.orders().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn insert_order(&self, order: Order) -> Result<Order> {
        self.orders().insert_one(&order).await?;
        Ok(order)
    }

    pub async fn update_order(&self, id: &str, patch: OrderPatch) -> Result<Order> {
        let update = order_update(patch)?;
        self.orders()
            .find_one_and_update(doc! {"id": id}, doc! {"$set": update})
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn delete_order(&self, id: &str) -> Result<()> {
        let deleted = self.orders().delete_one(doc! {"id": id}).await?;
        if deleted.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    pub async fn stats(&self) -> Result<Stats> {
        Ok(Stats {
            products_count: self.products().count_documents(doc! {}).await?,
            orders_count: self.orders().count_documents(doc! {}).await?,
            categories_count: self.categories().count_documents(doc! {}).await?,
            pending_orders_count: self
                .orders()
                .count_documents(doc! {"status": bijoux_core::order::PENDING})
                .await?,
        })
    }

    /// Bulk-load records migrated from the file backend, replacing any
    /// existing collection contents. Used by the CLI `migrate` command.
    pub async fn import(&self, products: &[Product], orders: &[Order]) -> Result<()> {
        if !products.is_empty() {
            self.products().delete_many(doc! {}).await?;
            self.products().insert_many(products).await?;
        }
        if !orders.is_empty() {
            self.orders().delete_many(doc! {}).await?;
            self.orders().insert_many(orders).await?;
        }
        Ok(())
    }

    fn products(&self) -> Collection<Product> {
        self.db.collection("products")
    }

    fn categories(&self) -> Collection<Category> {
        self.db.collection("categories")
    }

    fn settings(&self) -> Collection<StoreSettings> {
        self.db.collection("settings")
    }

    fn orders(&self) -> Collection<Order> {
        self.db.collection("orders")
    }
}

/// Build the `$set` document for a product patch.
///
/// Mirrors [`Product::apply`]: absent fields are untouched, empty sizes
/// are a no-op, and a replacement image list recomputes the primary.
fn product_update(patch: &ProductPatch) -> Result<Document> {
    let mut set = Document::new();
    if let Some(name) = &patch.name {
        set.insert("name", name.as_str());
    }
    if let Some(title) = &patch.title {
        set.insert("title", title.as_str());
    }
    if let Some(category) = &patch.category {
        set.insert("category", category.as_str());
    }
    if let Some(price) = &patch.price {
        set.insert("price", bson::to_bson(price)?);
    }
    if let Some(stock) = patch.stock {
        set.insert("stock", i64::from(stock));
    }
    if let Some(description) = &patch.description {
        set.insert("description", description.as_str());
    }
    if let Some(status) = patch.status {
        set.insert("status", status.as_str());
    }
    if !patch.sizes.is_empty() {
        set.insert("sizes", bson::to_bson(&patch.sizes)?);
    }
    if let Some(images) = &patch.images {
        // Explicit primary wins, otherwise the first of the replacement
        // list, otherwise empty.
        let primary = patch
            .image
            .clone()
            .filter(|image| !image.is_empty())
            .or_else(|| images.first().cloned())
            .unwrap_or_default();
        set.insert("image", primary);
        set.insert("images", bson::to_bson(images)?);
    } else if let Some(image) = &patch.image {
        set.insert("image", image.as_str());
    }
    set.insert("updatedAt", bson::to_bson(&Utc::now())?);
    Ok(set)
}

/// Build the `$set` document for an order patch. Flattened order fields
/// live at the top level of the stored document, so caller-supplied keys
/// and the `status` field set uniformly.
fn order_update(patch: OrderPatch) -> Result<Document> {
    let mut set = Document::new();
    for (key, value) in patch.into_fields() {
        set.insert(key, bson::to_bson(&value)?);
    }
    set.insert("updatedAt", bson::to_bson(&Utc::now())?);
    Ok(set)
}

/// Build the `$set` document for a settings patch.
fn settings_update(patch: &SettingsPatch) -> Result<Document> {
    let mut set = Document::new();
    if let Some(store_name) = &patch.store_name {
        set.insert("storeName", store_name.as_str());
    }
    if let Some(store_phone) = &patch.store_phone {
        set.insert("storePhone", store_phone.as_str());
    }
    if let Some(store_email) = &patch.store_email {
        set.insert("storeEmail", store_email.as_str());
    }
    if let Some(store_address) = &patch.store_address {
        set.insert("storeAddress", store_address.as_str());
    }
    if let Some(zones) = &patch.delivery_wilayas {
        set.insert("deliveryWilayas", bson::to_bson(zones)?);
    }
    set.insert("updatedAt", bson::to_bson(&Utc::now())?);
    Ok(set)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    #[test]
    fn product_update_sets_only_patched_fields() {
        let set = product_update(&ProductPatch {
            name: Some("Ring B".to_string()),
            price: Some(Decimal::from(900)),
            ..ProductPatch::default()
        })
        .unwrap();

        assert_eq!(set.get_str("name").unwrap(), "Ring B");
        // Money is a decimal string on the wire and in storage.
        assert_eq!(set.get_str("price").unwrap(), "900");
        assert!(set.get("description").is_none());
        assert!(set.get("image").is_none());
        assert!(set.get("updatedAt").is_some());
    }

    #[test]
    fn product_update_ignores_empty_sizes() {
        let set = product_update(&ProductPatch::default()).unwrap();
        assert!(set.get("sizes").is_none());

        let set = product_update(&ProductPatch {
            sizes: vec!["S".to_string()],
            ..ProductPatch::default()
        })
        .unwrap();
        assert!(set.get_array("sizes").is_ok());
    }

    #[test]
    fn product_update_replacing_images_recomputes_primary() {
        let set = product_update(&ProductPatch {
            images: Some(vec![
                "/uploads/a.png".to_string(),
                "/uploads/b.png".to_string(),
            ]),
            ..ProductPatch::default()
        })
        .unwrap();

        assert_eq!(set.get_str("image").unwrap(), "/uploads/a.png");
        assert_eq!(set.get_array("images").unwrap().len(), 2);
    }

    #[test]
    fn order_update_strips_bookkeeping_keys() {
        let fields = json!({"id": "forged", "createdAt": "1970-01-01", "status": "confirmed", "total": 500});
        let set = order_update(OrderPatch(fields.as_object().unwrap().clone())).unwrap();

        assert!(set.get("id").is_none());
        assert!(set.get("createdAt").is_none());
        assert_eq!(set.get_str("status").unwrap(), "confirmed");
        assert_eq!(set.get_i64("total").unwrap(), 500);
        assert!(set.get("updatedAt").is_some());
    }

    #[test]
    fn settings_update_uses_wire_field_names() {
        let set = settings_update(&SettingsPatch {
            store_phone: Some("+213 700 00 00 00".to_string()),
            ..SettingsPatch::default()
        })
        .unwrap();

        assert_eq!(set.get_str("storePhone").unwrap(), "+213 700 00 00 00");
        assert!(set.get("storeName").is_none());
        assert!(set.get("deliveryWilayas").is_none());
    }
}
