use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub dob: Option<Date>,
    pub role: i32,
    pub status: bool,
    pub warehouse_id: Option<i32>,
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
