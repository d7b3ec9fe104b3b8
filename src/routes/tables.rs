use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde_json::json;

use crate::{
    audit,
    dto::tables::{RecordList, RowData, RowPayload},
    error::{AppError, AppResult},
    middleware::auth::CurrentUser,
    models::{Record, SortOrder, Table},
    response::{ApiResponse, Meta},
    routes::params::{FieldQuery, ListQuery, SearchQuery},
    services::gateway::{Confirmation, HeaderGateway, guarded, notified},
    state::AppState,
    store::RecordStore,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{table}", get(list_rows).post(add_row))
        .route("/{table}/by", get(rows_by_field))
        .route("/{table}/search", get(search_rows).delete(clear_search))
        .route("/{table}/search/snapshot", delete(drop_snapshot))
        .route(
            "/{table}/{id}",
            get(row_details).patch(edit_row).delete(delete_row),
        )
}

/// Users are written through `/api/users` so passwords and roles are checked.
fn reject_users(table: Table) -> AppResult<()> {
    if table == Table::Users {
        return Err(AppError::BadRequest(
            "users are managed through /api/users".into(),
        ));
    }
    Ok(())
}

/// Refuses `password` as a filter on users.
fn reject_secret_filter(table: Table, field: &str) -> AppResult<()> {
    if table == Table::Users && field == "password" {
        return Err(AppError::BadRequest(
            "users cannot be filtered by password".into(),
        ));
    }
    Ok(())
}

/// Never echo stored passwords back over HTTP.
fn redact(table: Table, mut rows: Vec<Record>) -> Vec<Record> {
    if table == Table::Users {
        for row in &mut rows {
            if let Some(fields) = row.as_object_mut() {
                fields.remove("password");
            }
        }
    }
    rows
}

fn listed(message: &str, table: Table, rows: Vec<Record>) -> Json<ApiResponse<RecordList>> {
    let items = redact(table, rows);
    let meta = Meta::new(items.len() as i64);
    Json(ApiResponse::success(message, RecordList { items }, Some(meta)))
}

#[utoipa::path(
    get,
    path = "/api/tables/{table}",
    params(
        ("table" = Table, Path, description = "Table name"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Every row of the table", body = ApiResponse<RecordList>),
        (status = 400, description = "Unknown sort field"),
        (status = 401, description = "Not logged in"),
    ),
    tag = "Tables"
)]
pub async fn list_rows(
    State(state): State<AppState>,
    _user: CurrentUser,
    gateway: HeaderGateway,
    Path(table): Path<Table>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<RecordList>>> {
    let rows = notified(&gateway, &format!("Fetch {table}"), "Rows fetched", async {
        match query.sort_by.as_deref() {
            Some(field) => {
                let order = query.sort_order.unwrap_or(SortOrder::Asc);
                state.store.get_all_rows_sorted(table, field, order).await
            }
            None => state.store.get_all_rows(table).await,
        }
    })
    .await?;

    Ok(listed("Rows", table, rows))
}

#[utoipa::path(
    get,
    path = "/api/tables/{table}/by",
    params(
        ("table" = Table, Path, description = "Table name"),
        FieldQuery
    ),
    responses(
        (status = 200, description = "Rows whose field equals the value", body = ApiResponse<RecordList>),
        (status = 400, description = "Unknown field, mistyped value, or a user password filter"),
        (status = 401, description = "Not logged in"),
    ),
    tag = "Tables"
)]
pub async fn rows_by_field(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(table): Path<Table>,
    Query(query): Query<FieldQuery>,
) -> AppResult<Json<ApiResponse<RecordList>>> {
    reject_secret_filter(table, &query.field)?;
    let text = state.store.is_text_field(table, &query.field)?;
    let rows = state
        .store
        .get_by_field(table, &query.field, &query.json_value(text))
        .await?;
    Ok(listed("Rows", table, rows))
}

#[utoipa::path(
    get,
    path = "/api/tables/{table}/{id}",
    params(
        ("table" = Table, Path, description = "Table name"),
        ("id" = i32, Path, description = "Row id")
    ),
    responses(
        (status = 200, description = "One row", body = ApiResponse<RowData>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Tables"
)]
pub async fn row_details(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path((table, id)): Path<(Table, i32)>,
) -> AppResult<Json<ApiResponse<RowData>>> {
    let rows = state.store.get_by_field(table, "id", &json!(id)).await?;
    let row = redact(table, rows)
        .into_iter()
        .next()
        .ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::success("Row", RowData(row), Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/tables/{table}",
    params(("table" = Table, Path, description = "Table name")),
    request_body = RowPayload,
    responses(
        (status = 201, description = "Row added", body = ApiResponse<RowData>),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not logged in"),
        (status = 409, description = "Duplicate name"),
    ),
    tag = "Tables"
)]
pub async fn add_row(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    gateway: HeaderGateway,
    Path(table): Path<Table>,
    Json(RowPayload(payload)): Json<RowPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<RowData>>)> {
    reject_users(table)?;
    let row = notified(&gateway, &format!("Add {table}"), "Row has been added!", async {
        match table {
            Table::Inventories => state.entities.add_inventory(payload).await,
            t if t.has_unique_name() => state.entities.add_item_with_unique_name(t, payload).await,
            t => state.store.add(t, payload).await,
        }
    })
    .await?;

    audit::record(&state.orm, Some(user.id), "row_add", table.as_str(), json!({ "id": row["id"] })).await;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Row added", RowData(row), Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/tables/{table}/{id}",
    params(
        ("table" = Table, Path, description = "Table name"),
        ("id" = i32, Path, description = "Row id")
    ),
    request_body = RowPayload,
    responses(
        (status = 200, description = "Row updated", body = ApiResponse<RowData>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Tables"
)]
pub async fn edit_row(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    gateway: HeaderGateway,
    Path((table, id)): Path<(Table, i32)>,
    Json(RowPayload(fields)): Json<RowPayload>,
) -> AppResult<Json<ApiResponse<RowData>>> {
    reject_users(table)?;
    let row = notified(
        &gateway,
        &format!("Edit {table}"),
        "Row has been updated!",
        state.entities.edit_item_name(table, id, fields),
    )
    .await?;

    audit::record(&state.orm, Some(user.id), "row_edit", table.as_str(), json!({ "id": id })).await;
    Ok(Json(ApiResponse::success("Row updated", RowData(row), Some(Meta::empty()))))
}

#[utoipa::path(
    delete,
    path = "/api/tables/{table}/{id}",
    params(
        ("table" = Table, Path, description = "Table name"),
        ("id" = i32, Path, description = "Row id"),
        ("x-confirm" = bool, Header, description = "Must be true")
    ),
    responses(
        (status = 200, description = "Row deleted"),
        (status = 404, description = "Not Found"),
        (status = 428, description = "Not confirmed"),
    ),
    tag = "Tables"
)]
pub async fn delete_row(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    gateway: HeaderGateway,
    Path((table, id)): Path<(Table, i32)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    reject_users(table)?;
    guarded(
        &gateway,
        Confirmation::destructive(format!("Delete {table}")),
        "Row has been deleted!",
        state.store.delete_by_id(table, id),
    )
    .await?;

    audit::record(&state.orm, Some(user.id), "row_delete", table.as_str(), json!({ "id": id })).await;
    Ok(Json(ApiResponse::success("Row deleted", json!({ "id": id }), Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/tables/{table}/search",
    params(
        ("table" = Table, Path, description = "Table name"),
        SearchQuery
    ),
    responses(
        (status = 200, description = "Snapshot rows whose name starts with q", body = ApiResponse<RecordList>),
    ),
    tag = "Search"
)]
pub async fn search_rows(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(table): Path<Table>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<RecordList>>> {
    // Only the first search of a table needs the rows; later ones read the snapshot.
    let loaded = if state.search.has_snapshot(table)? {
        Vec::new()
    } else {
        redact(table, state.store.get_all_rows(table).await?)
    };
    let rows = state.search.search(table, &loaded, &query.q)?;
    Ok(listed("Search results", table, rows))
}

#[utoipa::path(
    delete,
    path = "/api/tables/{table}/search",
    params(("table" = Table, Path, description = "Table name")),
    responses(
        (status = 200, description = "The full snapshot, empty when nothing was searched", body = ApiResponse<RecordList>),
    ),
    tag = "Search"
)]
pub async fn clear_search(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(table): Path<Table>,
) -> AppResult<Json<ApiResponse<RecordList>>> {
    let rows = state.search.clear_search(table)?;
    Ok(listed("Search cleared", table, rows))
}

#[utoipa::path(
    delete,
    path = "/api/tables/{table}/search/snapshot",
    params(("table" = Table, Path, description = "Table name")),
    responses((status = 204, description = "Snapshot dropped")),
    tag = "Search"
)]
pub async fn drop_snapshot(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(table): Path<Table>,
) -> AppResult<StatusCode> {
    state.search.invalidate(table)?;
    Ok(StatusCode::NO_CONTENT)
}
