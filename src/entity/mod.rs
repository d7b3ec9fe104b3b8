pub mod audit_logs;
pub mod categories;
pub mod inventories;
pub mod inventory_tickets;
pub mod items;
pub mod suppliers;
pub mod tags;
pub mod users;
pub mod warehouses;

pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use inventories::Entity as Inventories;
pub use inventory_tickets::Entity as InventoryTickets;
pub use items::Entity as Items;
pub use suppliers::Entity as Suppliers;
pub use tags::Entity as Tags;
pub use users::Entity as Users;
pub use warehouses::Entity as Warehouses;
