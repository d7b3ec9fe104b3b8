use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entity;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Tables are derived from the entity definitions. No unique indexes and no
// foreign keys: uniqueness is checked by the services and relations are
// resolved in the entity layer.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        create(manager, &schema, entity::Categories).await?;
        create(manager, &schema, entity::Suppliers).await?;
        create(manager, &schema, entity::Tags).await?;
        create(manager, &schema, entity::Warehouses).await?;
        create(manager, &schema, entity::Items).await?;
        create(manager, &schema, entity::Inventories).await?;
        create(manager, &schema, entity::InventoryTickets).await?;
        create(manager, &schema, entity::Users).await?;
        create(manager, &schema, entity::AuditLogs).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table_of(manager, entity::AuditLogs).await?;
        drop_table_of(manager, entity::Users).await?;
        drop_table_of(manager, entity::InventoryTickets).await?;
        drop_table_of(manager, entity::Inventories).await?;
        drop_table_of(manager, entity::Items).await?;
        drop_table_of(manager, entity::Warehouses).await?;
        drop_table_of(manager, entity::Tags).await?;
        drop_table_of(manager, entity::Suppliers).await?;
        drop_table_of(manager, entity::Categories).await?;
        Ok(())
    }
}

async fn create<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(schema.create_table_from_entity(entity).if_not_exists().to_owned())
        .await
}

async fn drop_table_of<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}
