#![allow(dead_code)]

use inventory_console::{
    db::{create_orm_conn, run_migrations},
    models::{Payload, Record, Role, Table},
    store::{OrmStore, RecordStore},
};
use serde_json::{Value, json};

pub async fn memory_store() -> anyhow::Result<OrmStore> {
    let orm = create_orm_conn("sqlite::memory:").await?;
    run_migrations(&orm).await?;
    Ok(OrmStore::new(orm))
}

pub fn payload(value: Value) -> Payload {
    value.as_object().cloned().expect("payload must be a JSON object")
}

pub fn id_of(row: &Record) -> i32 {
    row["id"].as_i64().expect("row id") as i32
}

/// Inserts a user directly, with the password stored as given.
pub async fn insert_user(
    store: &OrmStore,
    email: &str,
    password: &str,
    role: Role,
    status: bool,
) -> anyhow::Result<i32> {
    let row = store
        .add(
            Table::Users,
            payload(json!({
                "email": email,
                "password": password,
                "first_name": "Test",
                "last_name": role.label(),
                "role": role.rank(),
                "status": status,
            })),
        )
        .await?;
    Ok(id_of(&row))
}
