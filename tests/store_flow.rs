mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{id_of, memory_store, payload};
use inventory_console::{
    error::{AppError, AppResult},
    models::{Payload, Record, SortOrder, Table},
    services::entity_service::EntityService,
    store::{OrmStore, RecordStore},
};
use serde_json::{Value, json};
use tokio::sync::Barrier;

#[tokio::test]
async fn added_row_reads_back_by_field() -> anyhow::Result<()> {
    let store = memory_store().await?;

    let added = store
        .add(Table::Warehouses, payload(json!({ "name": "North", "address": "7 Quay St" })))
        .await?;
    assert!(added["id"].is_number());
    assert!(added["created_at"].is_string());
    assert_eq!(added["created_at"], added["updated_at"]);

    let rows = store.get_by_field(Table::Warehouses, "name", &json!("North")).await?;
    assert_eq!(rows, vec![added.clone()]);
    assert!(store.is_exist(Table::Warehouses, "id", &added["id"]).await?);
    assert!(!store.is_exist(Table::Warehouses, "name", &json!("South")).await?);
    Ok(())
}

#[tokio::test]
async fn edit_changes_only_supplied_fields() -> anyhow::Result<()> {
    let store = memory_store().await?;
    let added = store
        .add(Table::Warehouses, payload(json!({ "name": "North", "address": "7 Quay St" })))
        .await?;

    let edited = store
        .edit(Table::Warehouses, id_of(&added), payload(json!({ "address": "9 Quay St" })))
        .await?;
    assert_eq!(edited["name"], "North");
    assert_eq!(edited["address"], "9 Quay St");
    assert_eq!(edited["created_at"], added["created_at"]);
    Ok(())
}

#[tokio::test]
async fn missing_ids_are_not_found() -> anyhow::Result<()> {
    let store = memory_store().await?;

    let edit = store.edit(Table::Tags, 404, payload(json!({ "name": "x" }))).await;
    assert!(matches!(edit, Err(AppError::NotFound)));
    let delete = store.delete_by_id(Table::Tags, 404).await;
    assert!(matches!(delete, Err(AppError::NotFound)));
    assert!(store.get_by_field(Table::Tags, "id", &json!(404)).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn hard_delete_removes_the_row() -> anyhow::Result<()> {
    let store = memory_store().await?;
    let tag = store.add(Table::Tags, payload(json!({ "name": "fragile" }))).await?;

    store.delete_by_id(Table::Tags, id_of(&tag)).await?;
    assert!(store.get_all_rows(Table::Tags).await?.is_empty());
    assert!(matches!(
        store.delete_by_id(Table::Tags, id_of(&tag)).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn malformed_payloads_are_rejected() -> anyhow::Result<()> {
    let store = memory_store().await?;

    for bad in [
        json!({ "id": 5, "name": "x" }),
        json!({ "name": "x", "created_at": "2025-01-01T00:00:00Z" }),
        json!({ "colour": "red" }),
        json!({ "name": 12 }),
        json!({}),
    ] {
        let result = store.add(Table::Tags, payload(bad.clone())).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))), "accepted {bad}");
    }
    assert!(matches!(
        store.get_by_field(Table::Tags, "colour", &json!("red")).await,
        Err(AppError::BadRequest(_))
    ));
    Ok(())
}

#[tokio::test]
async fn rows_can_be_listed_in_order() -> anyhow::Result<()> {
    let store = memory_store().await?;
    for name in ["b", "c", "a"] {
        store.add(Table::Categories, payload(json!({ "name": name }))).await?;
    }

    let names = |rows: Vec<Record>| -> Vec<String> {
        rows.iter().map(|r| r["name"].as_str().unwrap_or_default().to_string()).collect()
    };
    let desc = store.get_all_rows_sorted(Table::Categories, "name", SortOrder::Desc).await?;
    assert_eq!(names(desc), ["c", "b", "a"]);
    let asc = store.get_all_rows_sorted(Table::Categories, "name", SortOrder::Asc).await?;
    assert_eq!(names(asc), ["a", "b", "c"]);
    Ok(())
}

#[tokio::test]
async fn duplicate_names_are_refused_sequentially() -> anyhow::Result<()> {
    let entities = EntityService::new(memory_store().await?);

    entities
        .add_item_with_unique_name(Table::Suppliers, payload(json!({ "name": "Acme" })))
        .await?;
    let again = entities
        .add_item_with_unique_name(Table::Suppliers, payload(json!({ "name": "Acme" })))
        .await;

    match again {
        Err(err @ AppError::DuplicateName(_)) => {
            assert_eq!(err.to_string(), "Duplicate name detected: \"Acme\"!");
        }
        other => panic!("expected duplicate name, got {other:?}"),
    }
    // Same name in another table is fine.
    entities
        .add_item_with_unique_name(Table::Categories, payload(json!({ "name": "Acme" })))
        .await?;
    assert_eq!(entities.store().get_all_rows(Table::Suppliers).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn renames_are_not_rechecked() -> anyhow::Result<()> {
    let entities = EntityService::new(memory_store().await?);
    entities
        .add_item_with_unique_name(Table::Tags, payload(json!({ "name": "bulk" })))
        .await?;
    let other = entities
        .add_item_with_unique_name(Table::Tags, payload(json!({ "name": "loose" })))
        .await?;

    entities
        .edit_item_name(Table::Tags, id_of(&other), payload(json!({ "name": "bulk" })))
        .await?;
    let bulk = entities.store().get_by_field(Table::Tags, "name", &json!("bulk")).await?;
    assert_eq!(bulk.len(), 2);
    Ok(())
}

/// Holds every existence check until two callers have made theirs.
struct LockstepStore {
    inner: OrmStore,
    barrier: Arc<Barrier>,
}

#[async_trait]
impl RecordStore for LockstepStore {
    async fn get_all_rows(&self, table: Table) -> AppResult<Vec<Record>> {
        self.inner.get_all_rows(table).await
    }

    async fn get_by_field(&self, table: Table, field: &str, value: &Value) -> AppResult<Vec<Record>> {
        self.inner.get_by_field(table, field, value).await
    }

    async fn add(&self, table: Table, payload: Payload) -> AppResult<Record> {
        self.inner.add(table, payload).await
    }

    async fn edit(&self, table: Table, id: i32, payload: Payload) -> AppResult<Record> {
        self.inner.edit(table, id, payload).await
    }

    async fn delete_by_id(&self, table: Table, id: i32) -> AppResult<()> {
        self.inner.delete_by_id(table, id).await
    }

    async fn is_exist(&self, table: Table, field: &str, value: &Value) -> AppResult<bool> {
        let exists = self.inner.is_exist(table, field, value).await?;
        self.barrier.wait().await;
        Ok(exists)
    }
}

#[tokio::test]
async fn concurrent_adds_can_both_pass_the_name_check() -> anyhow::Result<()> {
    let inner = memory_store().await?;
    let entities = EntityService::new(LockstepStore {
        inner: inner.clone(),
        barrier: Arc::new(Barrier::new(2)),
    });

    let (first, second) = tokio::join!(
        entities.add_item_with_unique_name(Table::Categories, payload(json!({ "name": "Bolts" }))),
        entities.add_item_with_unique_name(Table::Categories, payload(json!({ "name": "Bolts" }))),
    );
    first?;
    second?;

    let rows = inner.get_by_field(Table::Categories, "name", &json!("Bolts")).await?;
    assert_eq!(rows.len(), 2);
    Ok(())
}

#[tokio::test]
async fn items_require_a_known_quantity_type() -> anyhow::Result<()> {
    let entities = EntityService::new(memory_store().await?);
    let item = json!({
        "name": "Bolt",
        "category_id": 1,
        "supplier_id": 1,
        "tags": [1, 2],
        "quantity_type": "bucket",
        "warning_limit": 5.0,
    });

    let refused = entities.add_item_with_unique_name(Table::Items, payload(item.clone())).await;
    assert!(matches!(refused, Err(AppError::BadRequest(_))));

    let mut item = payload(item);
    item.insert("quantity_type".into(), json!("box"));
    let added = entities.add_item_with_unique_name(Table::Items, item).await?;
    assert_eq!(added["tags"], json!([1, 2]));
    Ok(())
}

#[tokio::test]
async fn tickets_join_their_item() -> anyhow::Result<()> {
    let store = memory_store().await?;
    let entities = EntityService::new(store.clone());

    let item = store
        .add(
            Table::Items,
            payload(json!({
                "name": "Bolt",
                "category_id": 1,
                "supplier_id": 1,
                "quantity_type": "box",
                "warning_limit": 10.0,
            })),
        )
        .await?;
    let inventory = entities
        .add_inventory(payload(json!({ "warehouse_id": 1, "date": "2025-03-01" })))
        .await?;
    let other = entities
        .add_inventory(payload(json!({ "warehouse_id": 1, "date": "2025-03-02" })))
        .await?;

    let ticket = |inventory: &Record, item_id: i32, quantity: f64| {
        payload(json!({
            "inventory_id": inventory["id"],
            "item_id": item_id,
            "quantity": quantity,
            "expired_at": "2026-01-31",
        }))
    };
    store.add(Table::InventoryTickets, ticket(&inventory, id_of(&item), 4.0)).await?;
    store.add(Table::InventoryTickets, ticket(&inventory, 999, 1.5)).await?;
    store.add(Table::InventoryTickets, ticket(&other, id_of(&item), 8.0)).await?;

    let tickets = entities.get_all_matching_inventory_item(id_of(&inventory)).await?;
    assert_eq!(tickets.len(), 2);
    assert!(tickets.iter().all(|t| t.inventory_id == id_of(&inventory)));

    let joined = tickets[0].items.as_ref().expect("item joined");
    assert_eq!(joined.name, "Bolt");
    assert_eq!(joined.quantity_type, "box");
    assert_eq!(tickets[0].quantity, 4.0);
    assert!(tickets[1].items.is_none());

    assert!(entities.get_all_matching_inventory_item(404).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn deleting_an_inventory_keeps_its_tickets() -> anyhow::Result<()> {
    let store = memory_store().await?;
    let entities = EntityService::new(store.clone());

    let inventory = entities
        .add_inventory(payload(json!({ "warehouse_id": 1, "date": "2025-03-01" })))
        .await?;
    store
        .add(
            Table::InventoryTickets,
            payload(json!({ "inventory_id": inventory["id"], "item_id": 1, "quantity": 2.0 })),
        )
        .await?;

    store.delete_by_id(Table::Inventories, id_of(&inventory)).await?;
    assert!(store.get_all_rows(Table::Inventories).await?.is_empty());

    let tickets = entities.get_all_matching_inventory_item(id_of(&inventory)).await?;
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].inventory_id, id_of(&inventory));
    assert!(tickets[0].expired_at.is_none());
    Ok(())
}
