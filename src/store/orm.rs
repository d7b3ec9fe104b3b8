use std::{str::FromStr, sync::Arc};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
    sea_query::{Expr, Query, SimpleExpr},
};
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

use super::{
    RecordStore, STORE_MANAGED_FIELDS, TicketQueries, WriteHook, is_text_column, json_to_value,
};
use crate::{
    entity::{self, inventory_tickets, items},
    error::{AppError, AppResult},
    models::{InventoryTicketDetail, Payload, Record, SortOrder, Table, TicketItem},
};

/// Binds `$entity` to the sea-orm entity backing `$table` and evaluates `$body`.
macro_rules! with_entity {
    ($table:expr, $entity:ident => $body:expr) => {
        match $table {
            Table::Categories => {
                type $entity = entity::Categories;
                $body
            }
            Table::Suppliers => {
                type $entity = entity::Suppliers;
                $body
            }
            Table::Tags => {
                type $entity = entity::Tags;
                $body
            }
            Table::Warehouses => {
                type $entity = entity::Warehouses;
                $body
            }
            Table::Items => {
                type $entity = entity::Items;
                $body
            }
            Table::Inventories => {
                type $entity = entity::Inventories;
                $body
            }
            Table::InventoryTickets => {
                type $entity = entity::InventoryTickets;
                $body
            }
            Table::Users => {
                type $entity = entity::Users;
                $body
            }
        }
    };
}

/// [`RecordStore`] over a sea-orm connection.
#[derive(Clone)]
pub struct OrmStore {
    conn: DatabaseConnection,
    hooks: Vec<Arc<dyn WriteHook>>,
}

impl OrmStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            hooks: Vec::new(),
        }
    }

    pub fn with_write_hook(mut self, hook: Arc<dyn WriteHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Every row of `table` ordered by `field`.
    pub async fn get_all_rows_sorted(
        &self,
        table: Table,
        field: &str,
        order: SortOrder,
    ) -> AppResult<Vec<Record>> {
        with_entity!(table, E => all_rows::<E>(&self.conn, Some((field, order))).await)
    }

    /// Whether `field` of `table` holds text; unknown fields are `BadRequest`.
    pub fn is_text_field(&self, table: Table, field: &str) -> AppResult<bool> {
        with_entity!(table, E => column::<E>(field).map(|col| is_text_column(&col)))
    }

    fn written(&self, table: Table) {
        for hook in &self.hooks {
            hook.table_written(table);
        }
    }
}

#[async_trait]
impl RecordStore for OrmStore {
    async fn get_all_rows(&self, table: Table) -> AppResult<Vec<Record>> {
        tracing::debug!(%table, "select all");
        with_entity!(table, E => all_rows::<E>(&self.conn, None).await)
    }

    async fn get_by_field(
        &self,
        table: Table,
        field: &str,
        value: &JsonValue,
    ) -> AppResult<Vec<Record>> {
        tracing::debug!(%table, field, "select by field");
        with_entity!(table, E => rows_by_field::<E>(&self.conn, field, value).await)
    }

    async fn add(&self, table: Table, payload: Payload) -> AppResult<Record> {
        tracing::debug!(%table, "insert");
        let record = with_entity!(table, E => insert_row::<E>(&self.conn, &payload).await)?;
        self.written(table);
        Ok(record)
    }

    async fn edit(&self, table: Table, id: i32, payload: Payload) -> AppResult<Record> {
        tracing::debug!(%table, id, "update");
        let record = with_entity!(table, E => update_row::<E>(&self.conn, id, &payload).await)?;
        self.written(table);
        Ok(record)
    }

    async fn delete_by_id(&self, table: Table, id: i32) -> AppResult<()> {
        if table.soft_deletes() {
            tracing::debug!(%table, id, "soft delete");
            let mut payload = Payload::new();
            payload.insert("status".into(), json!(false));
            self.edit(table, id, payload).await?;
            return Ok(());
        }

        tracing::debug!(%table, id, "delete");
        with_entity!(table, E => delete_row::<E>(&self.conn, id).await)?;
        self.written(table);
        Ok(())
    }
}

#[async_trait]
impl TicketQueries for OrmStore {
    async fn tickets_for_inventory(
        &self,
        inventory_id: i32,
    ) -> AppResult<Vec<InventoryTicketDetail>> {
        let rows = entity::InventoryTickets::find()
            .filter(inventory_tickets::Column::InventoryId.eq(inventory_id))
            .order_by_asc(inventory_tickets::Column::Id)
            .find_also_related(entity::Items)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(ticket, item)| ticket_detail(ticket, item))
            .collect())
    }
}

fn ticket_detail(
    ticket: inventory_tickets::Model,
    item: Option<items::Model>,
) -> InventoryTicketDetail {
    InventoryTicketDetail {
        id: ticket.id,
        inventory_id: ticket.inventory_id,
        item_id: ticket.item_id,
        quantity: ticket.quantity,
        expired_at: ticket.expired_at,
        created_at: ticket.created_at,
        updated_at: ticket.updated_at,
        items: item.map(|item| TicketItem {
            name: item.name,
            quantity_type: item.quantity_type,
        }),
    }
}

fn column<E: EntityTrait>(field: &str) -> AppResult<E::Column> {
    E::Column::from_str(field).map_err(|_| {
        AppError::BadRequest(format!(
            "unknown field `{field}` on `{}`",
            E::default().table_name()
        ))
    })
}

fn to_record<M: Serialize>(model: M) -> AppResult<Record> {
    Ok(serde_json::to_value(model)?)
}

fn reject_store_managed(payload: &Payload) -> AppResult<()> {
    match STORE_MANAGED_FIELDS
        .iter()
        .find(|field| payload.contains_key(**field))
    {
        Some(field) => Err(AppError::BadRequest(format!(
            "`{field}` is assigned by the store"
        ))),
        None => Ok(()),
    }
}

async fn all_rows<E>(
    conn: &DatabaseConnection,
    order: Option<(&str, SortOrder)>,
) -> AppResult<Vec<Record>>
where
    E: EntityTrait,
    E::Model: Serialize,
{
    let mut finder = E::find();
    if let Some((field, order)) = order {
        let col = column::<E>(field)?;
        finder = match order {
            SortOrder::Asc => finder.order_by_asc(col),
            SortOrder::Desc => finder.order_by_desc(col),
        };
    }
    finder.all(conn).await?.into_iter().map(to_record).collect()
}

async fn rows_by_field<E>(
    conn: &DatabaseConnection,
    field: &str,
    value: &JsonValue,
) -> AppResult<Vec<Record>>
where
    E: EntityTrait,
    E::Model: Serialize,
{
    let col = column::<E>(field)?;
    let value = json_to_value(&col, value)?;
    E::find()
        .filter(col.eq(value))
        .all(conn)
        .await?
        .into_iter()
        .map(to_record)
        .collect()
}

async fn row_by_id<E>(conn: &DatabaseConnection, id: i32) -> AppResult<Option<Record>>
where
    E: EntityTrait,
    E::Model: Serialize,
{
    let id_col = column::<E>("id")?;
    E::find()
        .filter(id_col.eq(id))
        .one(conn)
        .await?
        .map(to_record)
        .transpose()
}

async fn insert_row<E>(conn: &DatabaseConnection, payload: &Payload) -> AppResult<Record>
where
    E: EntityTrait,
    E::Model: Serialize,
{
    reject_store_managed(payload)?;
    if payload.is_empty() {
        return Err(AppError::BadRequest("payload is empty".into()));
    }

    let mut columns = Vec::with_capacity(payload.len() + 2);
    let mut values: Vec<SimpleExpr> = Vec::with_capacity(payload.len() + 2);
    for (field, json) in payload {
        let col = column::<E>(field)?;
        values.push(json_to_value(&col, json)?.into());
        columns.push(col);
    }
    let now = Utc::now();
    columns.push(column::<E>("created_at")?);
    values.push(now.into());
    columns.push(column::<E>("updated_at")?);
    values.push(now.into());

    let stmt = Query::insert()
        .into_table(E::default())
        .columns(columns)
        .values(values)
        .map_err(|e| AppError::BadRequest(e.to_string()))?
        .returning_col(column::<E>("id")?)
        .to_owned();

    let backend = conn.get_database_backend();
    let row = conn
        .query_one(backend.build(&stmt))
        .await?
        .ok_or_else(|| AppError::Internal(anyhow!("insert returned no row")))?;
    let id: i32 = row.try_get("", "id")?;

    row_by_id::<E>(conn, id).await?.ok_or(AppError::NotFound)
}

async fn update_row<E>(conn: &DatabaseConnection, id: i32, payload: &Payload) -> AppResult<Record>
where
    E: EntityTrait,
    E::Model: Serialize,
{
    reject_store_managed(payload)?;

    let mut update = E::update_many();
    for (field, json) in payload {
        let col = column::<E>(field)?;
        update = update.col_expr(col, Expr::value(json_to_value(&col, json)?));
    }
    let result = update
        .col_expr(column::<E>("updated_at")?, Expr::value(Utc::now()))
        .filter(column::<E>("id")?.eq(id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    row_by_id::<E>(conn, id).await?.ok_or(AppError::NotFound)
}

async fn delete_row<E>(conn: &DatabaseConnection, id: i32) -> AppResult<()>
where
    E: EntityTrait,
{
    let result = E::delete_many()
        .filter(column::<E>("id")?.eq(id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
