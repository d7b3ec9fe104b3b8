use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    audit,
    dto::tables::{RowData, RowPayload},
    error::AppResult,
    middleware::auth::CurrentUser,
    models::InventoryTicketDetail,
    response::{ApiResponse, Meta},
    services::gateway::{HeaderGateway, notified},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketList {
    pub items: Vec<InventoryTicketDetail>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_inventory))
        .route("/{id}/tickets", get(inventory_tickets))
}

#[utoipa::path(
    post,
    path = "/api/inventories",
    request_body = RowPayload,
    responses(
        (status = 201, description = "Inventory added", body = ApiResponse<RowData>),
        (status = 400, description = "Invalid payload"),
    ),
    tag = "Inventories"
)]
pub async fn add_inventory(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    gateway: HeaderGateway,
    Json(RowPayload(payload)): Json<RowPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<RowData>>)> {
    let row = notified(
        &gateway,
        "Add Inventory",
        "Inventory has been added!",
        state.entities.add_inventory(payload),
    )
    .await?;

    audit::record(&state.orm, Some(user.id), "row_add", "inventories", json!({ "id": row["id"] })).await;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Inventory added", RowData(row), Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/inventories/{id}/tickets",
    params(("id" = i32, Path, description = "Inventory id")),
    responses(
        (status = 200, description = "Tickets with their item's name and quantity type", body = ApiResponse<TicketList>)
    ),
    tag = "Inventories"
)]
pub async fn inventory_tickets(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    let items = state.entities.get_all_matching_inventory_item(id).await?;
    let meta = Meta::new(items.len() as i64);
    Ok(Json(ApiResponse::success("Tickets", TicketList { items }, Some(meta))))
}
