//! Table-agnostic access to the remote relational store.
//!
//! Screens address tables by [`Table`] and exchange JSON rows. Joins are not
//! part of this contract; named joins live on [`TicketQueries`].

mod convert;
mod orm;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::{
    error::AppResult,
    models::{InventoryTicketDetail, Payload, Record, Table},
};

pub use convert::{is_text_column, json_to_value};
pub use orm::OrmStore;

/// Columns the store assigns; payloads carrying them are rejected.
pub const STORE_MANAGED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Generic CRUD over named tables. Every call is a single round trip and
/// nothing is retried.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every row of `table`, in store-defined order.
    async fn get_all_rows(&self, table: Table) -> AppResult<Vec<Record>>;

    /// Rows where `field == value`; empty when nothing matches.
    async fn get_by_field(
        &self,
        table: Table,
        field: &str,
        value: &JsonValue,
    ) -> AppResult<Vec<Record>>;

    /// Inserts a row and returns it with `id` and timestamps filled in.
    async fn add(&self, table: Table, payload: Payload) -> AppResult<Record>;

    /// Updates only the supplied fields of row `id`.
    async fn edit(&self, table: Table, id: i32, payload: Payload) -> AppResult<Record>;

    /// Removes row `id`, or marks it inactive for soft-delete tables.
    async fn delete_by_id(&self, table: Table, id: i32) -> AppResult<()>;

    async fn is_exist(&self, table: Table, field: &str, value: &JsonValue) -> AppResult<bool> {
        Ok(!self.get_by_field(table, field, value).await?.is_empty())
    }
}

/// Purpose-built join reads.
#[async_trait]
pub trait TicketQueries: Send + Sync {
    /// Tickets of one inventory with their item's name and quantity type.
    async fn tickets_for_inventory(&self, inventory_id: i32)
    -> AppResult<Vec<InventoryTicketDetail>>;
}

/// Told about every successful write, after it happened.
pub trait WriteHook: Send + Sync {
    fn table_written(&self, table: Table);
}
