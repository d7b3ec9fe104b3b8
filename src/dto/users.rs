use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub dob: Option<NaiveDate>,
    pub role: i32,
    #[serde(default = "active")]
    pub status: bool,
    pub warehouse_id: Option<i32>,
}

/// Partial user edit; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EditUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<i32>,
}
