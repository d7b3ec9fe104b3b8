use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_ticket")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub inventory_id: i32,
    pub item_id: i32,
    pub quantity: f64,
    pub expired_at: Option<Date>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

// No foreign keys: deleting an inventory leaves its tickets in place.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::inventories::Entity> for Entity {
    fn to() -> RelationDef {
        Entity::belongs_to(super::inventories::Entity)
            .from(Column::InventoryId)
            .to(super::inventories::Column::Id)
            .into()
    }
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Entity::belongs_to(super::items::Entity)
            .from(Column::ItemId)
            .to(super::items::Column::Id)
            .into()
    }
}

impl ActiveModelBehavior for ActiveModel {}
