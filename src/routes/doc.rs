use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LogoutResponse},
        tables::{RecordList, RowData, RowPayload},
        users::{EditUserRequest, RegisterRequest},
    },
    models::{InventoryTicketDetail, QuantityType, Role, SortOrder, Table, TicketItem, User},
    response::{ApiResponse, Meta, Outcome},
    routes::{auth, health, inventories, params, tables, users},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        auth::me,
        users::register,
        users::edit_user,
        users::delete_user,
        tables::list_rows,
        tables::rows_by_field,
        tables::row_details,
        tables::add_row,
        tables::edit_row,
        tables::delete_row,
        tables::search_rows,
        tables::clear_search,
        tables::drop_snapshot,
        inventories::add_inventory,
        inventories::inventory_tickets
    ),
    components(
        schemas(
            User,
            Role,
            Table,
            SortOrder,
            QuantityType,
            TicketItem,
            InventoryTicketDetail,
            LoginRequest,
            LogoutResponse,
            RegisterRequest,
            EditUserRequest,
            RowPayload,
            RowData,
            RecordList,
            inventories::TicketList,
            params::ListQuery,
            params::FieldQuery,
            params::SearchQuery,
            Meta,
            Outcome<User>,
            ApiResponse<User>,
            ApiResponse<RowData>,
            ApiResponse<RecordList>,
            ApiResponse<inventories::TicketList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Session endpoints"),
        (name = "Users", description = "User management"),
        (name = "Tables", description = "Generic table access"),
        (name = "Search", description = "Snapshot name search"),
        (name = "Inventories", description = "Inventory endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
