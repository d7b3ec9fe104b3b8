use serde_json::{Value as JsonValue, json};

use crate::{
    error::{AppError, AppResult},
    models::{InventoryTicketDetail, Payload, QuantityType, Record, Table},
    store::{RecordStore, TicketQueries},
};

/// Entity-level use cases composed from [`RecordStore`] calls.
#[derive(Clone)]
pub struct EntityService<S> {
    store: S,
}

impl<S> EntityService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: RecordStore> EntityService<S> {
    /// Inserts a row after checking no row of `table` has the same `name`.
    ///
    /// The check and the insert are separate round trips; two concurrent
    /// calls with the same name can both pass the check.
    pub async fn add_item_with_unique_name(&self, table: Table, payload: Payload) -> AppResult<Record> {
        let name = payload
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| AppError::BadRequest("`name` must be a string".into()))?
            .to_string();
        validate_quantity_type(table, &payload)?;

        if self.store.is_exist(table, "name", &json!(name)).await? {
            return Err(AppError::DuplicateName(name));
        }
        let record = self.store.add(table, payload).await?;
        tracing::info!(%table, %name, "row added");
        Ok(record)
    }

    /// Applies `fields` to row `id`. Renames are not re-checked for uniqueness.
    pub async fn edit_item_name(&self, table: Table, id: i32, fields: Payload) -> AppResult<Record> {
        validate_quantity_type(table, &fields)?;
        self.store.edit(table, id, fields).await
    }

    pub async fn add_inventory(&self, payload: Payload) -> AppResult<Record> {
        self.store.add(Table::Inventories, payload).await
    }
}

impl<S: TicketQueries> EntityService<S> {
    pub async fn get_all_matching_inventory_item(
        &self,
        inventory_id: i32,
    ) -> AppResult<Vec<InventoryTicketDetail>> {
        self.store.tickets_for_inventory(inventory_id).await
    }
}

fn validate_quantity_type(table: Table, payload: &Payload) -> AppResult<()> {
    if table != Table::Items {
        return Ok(());
    }
    match payload.get("quantity_type") {
        None => Ok(()),
        Some(JsonValue::String(value)) => value.parse::<QuantityType>().map(|_| ()),
        Some(other) => Err(AppError::BadRequest(format!(
            "Invalid quantity type `{other}`"
        ))),
    }
}
