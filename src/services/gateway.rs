//! Side channel to the operator: confirmation before destructive actions and
//! a success/error notice after every completed one.
//!
//! Notices are fire-and-forget; nothing in the core waits on them.

use std::future::Future;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub title: String,
    pub message: String,
}

impl Confirmation {
    pub fn destructive(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: "This action cannot be reverted. Are you sure you want to proceed?".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

pub trait Gateway: Send + Sync {
    fn confirm(&self, confirmation: &Confirmation) -> bool;
    fn notify(&self, notification: Notification);

    fn success(&self, title: &str, message: &str) {
        self.notify(Notification {
            level: NoticeLevel::Success,
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn error(&self, title: &str, message: &str) {
        self.notify(Notification {
            level: NoticeLevel::Error,
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

/// Gateway for HTTP callers: the request states up front whether the
/// operator confirmed (`x-confirm: true`), and notices become log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderGateway {
    pub confirmed: bool,
}

impl Gateway for HeaderGateway {
    fn confirm(&self, confirmation: &Confirmation) -> bool {
        if !self.confirmed {
            tracing::info!(title = %confirmation.title, "destructive action not confirmed");
        }
        self.confirmed
    }

    fn notify(&self, notification: Notification) {
        match notification.level {
            NoticeLevel::Success => {
                tracing::info!(title = %notification.title, message = %notification.message, "success")
            }
            NoticeLevel::Error => {
                tracing::warn!(title = %notification.title, message = %notification.message, "error")
            }
        }
    }
}

/// Runs `op` and reports its outcome.
pub async fn notified<T, F>(
    gateway: &dyn Gateway,
    title: &str,
    success_message: &str,
    op: F,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    let result = op.await;
    match &result {
        Ok(_) => gateway.success(title, success_message),
        Err(err) => gateway.error(title, &err.to_string()),
    }
    result
}

/// Asks for confirmation, then runs and reports `op`. A declined prompt
/// yields [`AppError::Cancelled`] and `op` is never polled.
pub async fn guarded<T, F>(
    gateway: &dyn Gateway,
    confirmation: Confirmation,
    success_message: &str,
    op: F,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    if !gateway.confirm(&confirmation) {
        return Err(AppError::Cancelled);
    }
    notified(gateway, &confirmation.title, success_message, op).await
}
