pub mod entity_service;
pub mod gateway;
pub mod password;
pub mod search_cache;
pub mod session_service;
