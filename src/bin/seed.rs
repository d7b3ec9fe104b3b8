use inventory_console::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    error::AppError,
    models::{Payload, Record, Role, Table},
    services::{entity_service::EntityService, password},
    store::{OrmStore, RecordStore},
};
use serde_json::{Value, json};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let store = OrmStore::new(orm);
    let admin_id = ensure_super_admin(&store, &config, "admin@example.com", "admin123").await?;

    let entities = EntityService::new(store);
    let category = ensure_named(&entities, Table::Categories, json!({ "name": "Hardware" })).await?;
    let supplier = ensure_named(&entities, Table::Suppliers, json!({ "name": "Acme Supply" })).await?;
    let tag = ensure_named(&entities, Table::Tags, json!({ "name": "fasteners" })).await?;
    ensure_named(
        &entities,
        Table::Warehouses,
        json!({ "name": "Main", "address": "1 Depot Road" }),
    )
    .await?;
    for (name, quantity_type) in [("Bolt", "box"), ("Nut", "box"), ("Washer", "piece")] {
        ensure_named(
            &entities,
            Table::Items,
            json!({
                "name": name,
                "category_id": category["id"],
                "supplier_id": supplier["id"],
                "tags": [tag["id"]],
                "quantity_type": quantity_type,
                "warning_limit": 10.0,
            }),
        )
        .await?;
    }

    println!("Seed completed. Super admin ID: {admin_id}");
    Ok(())
}

// Bypasses the role ceiling: there is nobody logged in to outrank yet.
async fn ensure_super_admin(
    store: &OrmStore,
    config: &AppConfig,
    email: &str,
    plain: &str,
) -> anyhow::Result<i32> {
    if let Some(existing) = store
        .get_by_field(Table::Users, "email", &json!(email))
        .await?
        .into_iter()
        .next()
    {
        return Ok(id_of(&existing)?);
    }

    let row = store
        .add(
            Table::Users,
            object(json!({
                "email": email,
                "password": password::prepare(config.password_mode, plain)?,
                "first_name": "Super",
                "last_name": "Admin",
                "role": Role::SuperAdmin.rank(),
                "status": true,
            }))?,
        )
        .await?;
    println!("Ensured user {email} (role={})", Role::SuperAdmin.label());
    Ok(id_of(&row)?)
}

async fn ensure_named(
    entities: &EntityService<OrmStore>,
    table: Table,
    fields: Value,
) -> anyhow::Result<Record> {
    let name = fields["name"].clone();
    match entities.add_item_with_unique_name(table, object(fields)?).await {
        Ok(row) => Ok(row),
        Err(AppError::DuplicateName(_)) => entities
            .store()
            .get_by_field(table, "name", &name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("{table} row {name} vanished")),
        Err(err) => Err(err.into()),
    }
}

fn object(value: Value) -> anyhow::Result<Payload> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(anyhow::anyhow!("expected an object, got {other}")),
    }
}

fn id_of(row: &Record) -> anyhow::Result<i32> {
    row["id"]
        .as_i64()
        .and_then(|id| i32::try_from(id).ok())
        .ok_or_else(|| anyhow::anyhow!("row without an integer id"))
}
