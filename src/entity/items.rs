use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    pub supplier_id: i32,
    /// Tag ids, kept as a JSON array.
    pub tags: Option<Json>,
    pub quantity_type: String,
    pub warning_limit: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

// Relations live here only; the store carries no foreign keys.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Entity::belongs_to(super::categories::Entity)
            .from(Column::CategoryId)
            .to(super::categories::Column::Id)
            .into()
    }
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Entity::belongs_to(super::suppliers::Entity)
            .from(Column::SupplierId)
            .to(super::suppliers::Column::Id)
            .into()
    }
}

impl ActiveModelBehavior for ActiveModel {}
