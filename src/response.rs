use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(total: i64) -> Self {
        Self { total: Some(total) }
    }

    pub fn empty() -> Self {
        Self { total: None }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

/// Result shape for flows whose expected failures are values, not errors
/// (login, user deletion).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Outcome<T> {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Outcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            status: false,
            data: None,
            message: Some(message.into()),
        }
    }
}
