use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Duplicate name detected: \"{0}\"!")]
    DuplicateName(String),

    #[error("Duplicate email detected!")]
    DuplicateEmail,

    #[error("Cannot find matching user email!")]
    UserNotFound,

    #[error("User is not activated! Please contact the admin!")]
    AccountDeactivated,

    #[error("Incorrect password!")]
    IncorrectCredentials,

    #[error("You are not authenticated for this action!")]
    Unauthenticated,

    #[error("{0}")]
    AuthorizationDenied(String),

    #[error("Action cancelled")]
    Cancelled,

    #[error("Store error: {0}")]
    Store(#[from] sea_orm::DbErr),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::IncorrectCredentials => StatusCode::BAD_REQUEST,
            AppError::DuplicateName(_) | AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::AccountDeactivated | AppError::AuthorizationDenied(_) => {
                StatusCode::FORBIDDEN
            }
            AppError::Cancelled => StatusCode::PRECONDITION_REQUIRED,
            AppError::Store(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
