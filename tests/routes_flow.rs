mod common;

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequestParts, Path, Query, State},
    http::Request,
};
use common::{id_of, insert_user, payload};
use inventory_console::{
    config::{CachePolicy, PasswordMode},
    db::{create_orm_conn, run_migrations},
    dto::{auth::LoginRequest, tables::RowPayload},
    error::AppError,
    middleware::auth::CurrentUser,
    models::{Role, Table},
    routes::{
        auth,
        params::{FieldQuery, ListQuery, SearchQuery},
        tables,
    },
    services::{gateway::HeaderGateway, session_service::SessionOptions},
    state::AppState,
    storage::MemoryStorage,
};
use serde_json::json;

async fn setup() -> anyhow::Result<(AppState, CurrentUser)> {
    let orm = create_orm_conn("sqlite::memory:").await?;
    run_migrations(&orm).await?;
    let state = AppState::new(
        orm,
        Arc::new(MemoryStorage::new()),
        SessionOptions {
            password_mode: PasswordMode::Plaintext,
            enforce_role_ceiling: true,
        },
        CachePolicy::InvalidateOnWrite,
    );
    insert_user(&state.store, "admin@x.io", "Secret1", Role::Admin, true).await?;

    let login = auth::login(
        State(state.clone()),
        HeaderGateway::default(),
        Json(LoginRequest {
            email: "admin@x.io".into(),
            password: "Secret1".into(),
        }),
    )
    .await?;
    let user = login.0.data.clone().expect("logged in");
    Ok((state, CurrentUser(user)))
}

fn confirmed() -> HeaderGateway {
    HeaderGateway { confirmed: true }
}

#[tokio::test]
async fn add_list_and_delete_rows() -> anyhow::Result<()> {
    let (state, user) = setup().await?;

    let (status, added) = tables::add_row(
        State(state.clone()),
        user.clone(),
        HeaderGateway::default(),
        Path(Table::Tags),
        Json(RowPayload(payload(json!({ "name": "fragile" })))),
    )
    .await?;
    assert_eq!(status, axum::http::StatusCode::CREATED);
    let id = id_of(&added.0.data.expect("row").0);

    let duplicate = tables::add_row(
        State(state.clone()),
        user.clone(),
        HeaderGateway::default(),
        Path(Table::Tags),
        Json(RowPayload(payload(json!({ "name": "fragile" })))),
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::DuplicateName(_))));

    let listed = tables::list_rows(
        State(state.clone()),
        user.clone(),
        HeaderGateway::default(),
        Path(Table::Tags),
        Query(ListQuery {
            sort_by: None,
            sort_order: None,
        }),
    )
    .await?;
    assert_eq!(listed.0.meta.and_then(|m| m.total), Some(1));

    let unconfirmed = tables::delete_row(
        State(state.clone()),
        user.clone(),
        HeaderGateway::default(),
        Path((Table::Tags, id)),
    )
    .await;
    assert!(matches!(unconfirmed, Err(AppError::Cancelled)));

    tables::delete_row(State(state.clone()), user.clone(), confirmed(), Path((Table::Tags, id))).await?;
    let missing = tables::row_details(State(state), user, Path((Table::Tags, id))).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn users_are_redacted_and_not_writable_here() -> anyhow::Result<()> {
    let (state, user) = setup().await?;

    let listed = tables::list_rows(
        State(state.clone()),
        user.clone(),
        HeaderGateway::default(),
        Path(Table::Users),
        Query(ListQuery {
            sort_by: Some("email".into()),
            sort_order: None,
        }),
    )
    .await?;
    let rows = listed.0.data.expect("rows").items;
    assert_eq!(rows.len(), 1);
    assert!(rows[0].get("password").is_none());

    let searched = tables::search_rows(
        State(state.clone()),
        user.clone(),
        Path(Table::Users),
        Query(SearchQuery { q: String::new() }),
    )
    .await?;
    assert!(searched.0.data.expect("rows").items.is_empty());

    let write = tables::add_row(
        State(state),
        user,
        confirmed(),
        Path(Table::Users),
        Json(RowPayload(payload(json!({ "email": "x@x.io" })))),
    )
    .await;
    assert!(matches!(write, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn audit_log_records_writes() -> anyhow::Result<()> {
    use inventory_console::entity::AuditLogs;
    use sea_orm::EntityTrait;

    let (state, user) = setup().await?;
    tables::add_row(
        State(state.clone()),
        user,
        HeaderGateway::default(),
        Path(Table::Warehouses),
        Json(RowPayload(payload(json!({ "name": "North" })))),
    )
    .await?;

    let actions: Vec<String> = AuditLogs::find()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|log| log.action)
        .collect();
    assert_eq!(actions, ["login", "row_add"]);
    Ok(())
}

#[tokio::test]
async fn table_reads_need_a_session() -> anyhow::Result<()> {
    let (state, _user) = setup().await?;
    let (mut parts, _) = Request::new(()).into_parts();

    assert!(CurrentUser::from_request_parts(&mut parts, &state).await.is_ok());
    state.session.logout()?;
    let anonymous = CurrentUser::from_request_parts(&mut parts, &state).await;
    assert!(matches!(anonymous, Err(AppError::Unauthenticated)));
    Ok(())
}

#[tokio::test]
async fn users_cannot_be_filtered_by_password() -> anyhow::Result<()> {
    let (state, user) = setup().await?;

    let by_password = tables::rows_by_field(
        State(state.clone()),
        user.clone(),
        Path(Table::Users),
        Query(FieldQuery {
            field: "password".into(),
            value: "Secret1".into(),
        }),
    )
    .await;
    assert!(matches!(by_password, Err(AppError::BadRequest(_))));

    let by_email = tables::rows_by_field(
        State(state),
        user,
        Path(Table::Users),
        Query(FieldQuery {
            field: "email".into(),
            value: "admin@x.io".into(),
        }),
    )
    .await?;
    let rows = by_email.0.data.expect("rows").items;
    assert_eq!(rows.len(), 1);
    assert!(rows[0].get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn numeric_text_matches_text_columns() -> anyhow::Result<()> {
    let (state, user) = setup().await?;
    tables::add_row(
        State(state.clone()),
        user.clone(),
        HeaderGateway::default(),
        Path(Table::Tags),
        Json(RowPayload(payload(json!({ "name": "2024" })))),
    )
    .await?;

    let by_name = tables::rows_by_field(
        State(state.clone()),
        user.clone(),
        Path(Table::Tags),
        Query(FieldQuery {
            field: "name".into(),
            value: "2024".into(),
        }),
    )
    .await?;
    let rows = by_name.0.data.expect("rows").items;
    assert_eq!(rows.len(), 1);

    let by_id = tables::rows_by_field(
        State(state),
        user,
        Path(Table::Tags),
        Query(FieldQuery {
            field: "id".into(),
            value: rows[0]["id"].to_string(),
        }),
    )
    .await?;
    assert_eq!(by_id.0.data.expect("rows").items.len(), 1);
    Ok(())
}
