use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, models::User, services::gateway::HeaderGateway, state::AppState};

/// Header through which the operator confirms a destructive request.
pub const CONFIRM_HEADER: &str = "x-confirm";

/// The logged-in user, re-read from the store for every request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = state.session.get_current_user().await?;
        Ok(CurrentUser(user))
    }
}

impl<S> FromRequestParts<S> for HeaderGateway
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let confirmed = parts
            .headers
            .get(CONFIRM_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));
        Ok(HeaderGateway { confirmed })
    }
}
