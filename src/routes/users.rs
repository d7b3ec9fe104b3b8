use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
};
use serde_json::json;

use crate::{
    audit,
    dto::users::{EditUserRequest, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::CurrentUser,
    models::User,
    response::{ApiResponse, Meta, Outcome},
    services::gateway::{Confirmation, Gateway, HeaderGateway, notified},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/{id}", patch(edit_user).delete(delete_user))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<User>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Role above the current user's"),
        (status = 409, description = "Duplicate email"),
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    gateway: HeaderGateway,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = notified(
        &gateway,
        "Register User",
        "User has been registered!",
        state.session.register_user(payload),
    )
    .await?;

    let by = state.session.cached_user().ok().flatten().map(|u| u.id);
    audit::record(&state.orm, by, "user_register", "users", json!({ "id": user.id })).await;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User registered", user, Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = EditUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Target or new role above the current user's, or own role/status"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Users"
)]
pub async fn edit_user(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    gateway: HeaderGateway,
    Path(id): Path<i32>,
    Json(payload): Json<EditUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = notified(
        &gateway,
        "Edit User",
        "User has been updated!",
        state.session.edit_user(id, payload),
    )
    .await?;

    audit::record(&state.orm, Some(current.id), "user_edit", "users", json!({ "id": id })).await;
    Ok(Json(ApiResponse::success("User updated", user, Some(Meta::empty()))))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = i32, Path, description = "User id"),
        ("x-confirm" = bool, Header, description = "Must be true")
    ),
    responses(
        (status = 200, description = "Deletion outcome; refused for oneself or a higher role", body = Outcome<User>),
        (status = 404, description = "Not Found"),
        (status = 428, description = "Not confirmed"),
    ),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    gateway: HeaderGateway,
    Path(id): Path<i32>,
) -> AppResult<Json<Outcome<User>>> {
    let confirmation = Confirmation::destructive("Delete User");
    if !gateway.confirm(&confirmation) {
        return Err(AppError::Cancelled);
    }

    let outcome = match state.session.delete_user(id).await {
        Ok(outcome) => outcome,
        Err(err) => {
            gateway.error(&confirmation.title, &err.to_string());
            return Err(err);
        }
    };
    match &outcome.message {
        None => {
            gateway.success(&confirmation.title, "User has been deleted!");
            audit::record(&state.orm, Some(current.id), "user_delete", "users", json!({ "id": id })).await;
        }
        Some(message) => gateway.error(&confirmation.title, message),
    }
    Ok(Json(outcome))
}
