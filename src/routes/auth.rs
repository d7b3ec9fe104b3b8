use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    audit,
    dto::auth::{LoginRequest, LogoutResponse},
    error::AppResult,
    middleware::auth::CurrentUser,
    models::User,
    response::{ApiResponse, Meta, Outcome},
    services::gateway::{Gateway, HeaderGateway},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login outcome; status is false with a message on refusal", body = Outcome<User>)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    gateway: HeaderGateway,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<Outcome<User>>> {
    let outcome = state.session.login(&payload.email, &payload.password).await?;
    match (&outcome.data, &outcome.message) {
        (Some(user), _) => {
            gateway.success("Login", "Logged in");
            audit::record(&state.orm, Some(user.id), "login", "users", serde_json::json!({})).await;
        }
        (None, Some(message)) => gateway.error("Login", message),
        (None, None) => {}
    }
    Ok(Json(outcome))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session slot cleared", body = ApiResponse<LogoutResponse>)
    ),
    tag = "Auth"
)]
pub async fn logout(State(state): State<AppState>) -> AppResult<Json<ApiResponse<LogoutResponse>>> {
    state.session.logout()?;
    Ok(Json(ApiResponse::success(
        "Logged out",
        LogoutResponse { logged_out: true },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user, re-read from the store", body = ApiResponse<User>),
        (status = 401, description = "Not logged in, or the account was removed or deactivated"),
    ),
    tag = "Auth"
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<User>> {
    Json(ApiResponse::success("Current user", user, Some(Meta::empty())))
}
