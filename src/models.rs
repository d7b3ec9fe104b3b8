use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// One row as returned by the store: a JSON object.
pub type Record = serde_json::Value;

/// Full or partial row payload keyed by column name.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Tables the console operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Categories,
    Suppliers,
    Tags,
    Warehouses,
    Items,
    Inventories,
    #[serde(rename = "inventory_ticket")]
    InventoryTickets,
    Users,
}

impl Table {
    pub const ALL: [Table; 8] = [
        Table::Categories,
        Table::Suppliers,
        Table::Tags,
        Table::Warehouses,
        Table::Items,
        Table::Inventories,
        Table::InventoryTickets,
        Table::Users,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Categories => "categories",
            Table::Suppliers => "suppliers",
            Table::Tags => "tags",
            Table::Warehouses => "warehouses",
            Table::Items => "items",
            Table::Inventories => "inventories",
            Table::InventoryTickets => "inventory_ticket",
            Table::Users => "users",
        }
    }

    /// Tables whose `name` must be unique (checked before insert).
    pub fn has_unique_name(&self) -> bool {
        matches!(
            self,
            Table::Categories | Table::Suppliers | Table::Tags | Table::Warehouses | Table::Items
        )
    }

    /// Deleting from these tables sets `status = false` instead of removing the row.
    pub fn soft_deletes(&self) -> bool {
        matches!(self, Table::Users)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::BadRequest(format!("unknown table `{s}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// User rank; a higher value outranks a lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest = 0,
    User = 1,
    Admin = 2,
    SuperAdmin = 3,
}

impl Role {
    pub fn rank(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Guest => "Guest",
            Role::User => "User",
            Role::Admin => "Admin",
            Role::SuperAdmin => "Super Admin",
        }
    }
}

impl TryFrom<i32> for Role {
    type Error = AppError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Guest),
            1 => Ok(Role::User),
            2 => Ok(Role::Admin),
            3 => Ok(Role::SuperAdmin),
            other => Err(AppError::BadRequest(format!("Invalid role `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuantityType {
    Piece,
    Box,
    Pack,
    Kg,
    G,
    L,
    Ml,
}

impl QuantityType {
    pub const ALL: [QuantityType; 7] = [
        QuantityType::Piece,
        QuantityType::Box,
        QuantityType::Pack,
        QuantityType::Kg,
        QuantityType::G,
        QuantityType::L,
        QuantityType::Ml,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityType::Piece => "piece",
            QuantityType::Box => "box",
            QuantityType::Pack => "pack",
            QuantityType::Kg => "kg",
            QuantityType::G => "g",
            QuantityType::L => "l",
            QuantityType::Ml => "ml",
        }
    }
}

impl FromStr for QuantityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuantityType::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid quantity type `{s}`")))
    }
}

/// User row as held by the session slot and returned to screens.
///
/// The password never leaves the service layer: it is skipped when
/// serializing and defaults to empty when read back from the slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub dob: Option<NaiveDate>,
    pub role: i32,
    pub status: bool,
    pub warehouse_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Rank of the stored role; unknown values rank below `Guest`.
    pub fn rank(&self) -> i32 {
        Role::try_from(self.role).map(Role::rank).unwrap_or(-1)
    }
}

/// The joined item fields carried by a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TicketItem {
    pub name: String,
    pub quantity_type: String,
}

/// Inventory ticket enriched with its item, as listed per inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InventoryTicketDetail {
    pub id: i32,
    pub inventory_id: i32,
    pub item_id: i32,
    pub quantity: f64,
    pub expired_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// `None` when the item row no longer exists.
    pub items: Option<TicketItem>,
}
