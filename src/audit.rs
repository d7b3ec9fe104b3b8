use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, Set};
use serde_json::Value;

use crate::{entity::audit_logs::ActiveModel, error::AppResult};

pub async fn log_audit(
    conn: &DatabaseConnection,
    user_id: Option<i32>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        action: Set(action.to_string()),
        resource: Set(resource.map(str::to_string)),
        metadata: Set(metadata),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await?;

    Ok(())
}

/// Records the action, logging instead of failing when the write fails.
pub async fn record(
    conn: &DatabaseConnection,
    user_id: Option<i32>,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    if let Err(err) = log_audit(conn, user_id, action, Some(resource), Some(metadata)).await {
        tracing::warn!(error = %err, "audit log failed");
    }
}
