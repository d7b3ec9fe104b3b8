use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub warehouse_id: i32,
    pub date: Date,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::warehouses::Entity> for Entity {
    fn to() -> RelationDef {
        Entity::belongs_to(super::warehouses::Entity)
            .from(Column::WarehouseId)
            .to(super::warehouses::Column::Id)
            .into()
    }
}

impl ActiveModelBehavior for ActiveModel {}
