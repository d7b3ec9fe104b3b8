pub mod auth;
pub mod tables;
pub mod users;
