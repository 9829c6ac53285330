//! Orders, settings, and stats through the facade, file backend.

#![allow(clippy::unwrap_used)]

use serde_json::{Map, Value, json};

use bijoux_core::{OrderPatch, SettingsPatch};
use bijoux_integration_tests::{TestStore, draft};
use bijoux_server::store::StoreError;

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().unwrap().clone()
}

#[tokio::test]
async fn orders_list_newest_first() {
    let test = TestStore::open().await;

    let first = test
        .store
        .create_order(fields(json!({"customer": "first"})))
        .await
        .unwrap();
    let second = test
        .store
        .create_order(fields(json!({"customer": "second"})))
        .await
        .unwrap();

    let orders = test.store.list_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.first().unwrap().created_at >= orders.last().unwrap().created_at);
    assert_eq!(orders.last().unwrap().id, first.id);
    assert_eq!(orders.first().unwrap().id, second.id);
}

#[tokio::test]
async fn order_lifecycle() {
    let test = TestStore::open().await;

    let order = test
        .store
        .create_order(fields(json!({"customer": "Lina", "wilaya": "Alger"})))
        .await
        .unwrap();
    assert_eq!(order.status, "pending");

    let updated = test
        .store
        .update_order(&order.id, OrderPatch(fields(json!({"status": "confirmed"}))))
        .await
        .unwrap();
    assert_eq!(updated.status, "confirmed");
    assert_eq!(updated.fields["customer"], json!("Lina"));

    test.store.delete_order(&order.id).await.unwrap();
    let err = test.store.delete_order(&order.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn stats_counts_are_consistent() {
    let test = TestStore::open().await;

    test.store.create_product(draft("Ring")).await.unwrap();
    let pending = test
        .store
        .create_order(fields(json!({"customer": "a"})))
        .await
        .unwrap();
    test.store
        .create_order(fields(json!({"customer": "b"})))
        .await
        .unwrap();
    test.store
        .update_order(&pending.id, OrderPatch(fields(json!({"status": "shipped"}))))
        .await
        .unwrap();

    let stats = test.store.stats().await.unwrap();
    let orders = test.store.list_orders().await.unwrap();

    assert_eq!(stats.products_count, 1);
    assert_eq!(stats.categories_count, 6);
    assert_eq!(stats.orders_count, orders.len() as u64);
    assert!(stats.pending_orders_count <= stats.orders_count);
    assert_eq!(stats.pending_orders_count, 1);
}

#[tokio::test]
async fn settings_merge_is_shallow() {
    let test = TestStore::open().await;

    let seeded = test.store.get_settings().await.unwrap();
    assert_eq!(seeded.delivery_wilayas.len(), 10);

    let updated = test
        .store
        .update_settings(SettingsPatch {
            store_phone: Some("+213 700 00 00 00".to_string()),
            ..SettingsPatch::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.store_phone, "+213 700 00 00 00");
    assert_eq!(updated.store_name, seeded.store_name);
    assert_eq!(updated.delivery_wilayas, seeded.delivery_wilayas);
    assert!(updated.updated_at.is_some());

    // The merge is persisted, not just returned.
    let fetched = test.store.get_settings().await.unwrap();
    assert_eq!(fetched.store_phone, "+213 700 00 00 00");
}
