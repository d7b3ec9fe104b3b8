use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value as JsonValue, json};

use crate::{
    config::PasswordMode,
    dto::users::{EditUserRequest, RegisterRequest},
    error::{AppError, AppResult},
    models::{Payload, Role, Table, User},
    response::Outcome,
    services::password,
    storage::KeyValueStorage,
    store::RecordStore,
};

/// Storage key of the session slot.
pub const SESSION_SLOT: &str = "user_data";

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub password_mode: PasswordMode,
    /// Refuse to register users ranked above the current user.
    pub enforce_role_ceiling: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            password_mode: PasswordMode::Argon2,
            enforce_role_ceiling: true,
        }
    }
}

/// Who is logged in, and the user operations that depend on it.
///
/// The session is a single slot: anonymous while empty, authenticated while
/// it holds a user record.
#[derive(Clone)]
pub struct SessionService<S> {
    store: S,
    storage: Arc<dyn KeyValueStorage>,
    options: SessionOptions,
}

impl<S: RecordStore> SessionService<S> {
    pub fn new(store: S, storage: Arc<dyn KeyValueStorage>, options: SessionOptions) -> Self {
        Self {
            store,
            storage,
            options,
        }
    }

    /// Expected failures come back as a refused [`Outcome`]; only store and
    /// storage failures are errors.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Outcome<User>> {
        let Some(user) = self.find_user_by("email", json!(email)).await? else {
            return Ok(Outcome::refused(AppError::UserNotFound.to_string()));
        };

        if !user.status {
            return Ok(Outcome::refused(AppError::AccountDeactivated.to_string()));
        }

        if !password::matches(self.options.password_mode, &user.password, password) {
            return Ok(Outcome::refused(AppError::IncorrectCredentials.to_string()));
        }

        self.store_session(&user)?;
        tracing::info!(user_id = user.id, "user logged in");
        Ok(Outcome::ok(user))
    }

    pub fn logout(&self) -> AppResult<()> {
        self.storage.remove(SESSION_SLOT)?;
        tracing::info!("user logged out");
        Ok(())
    }

    /// The cached record as stored at login, without consulting the store.
    pub fn cached_user(&self) -> AppResult<Option<User>> {
        match self.storage.get(SESSION_SLOT)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// The current user as the store has it now.
    ///
    /// A user that was removed or deactivated since login ends the session.
    pub async fn get_current_user(&self) -> AppResult<User> {
        let cached = match self.cached_user() {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AppError::Unauthenticated),
            Err(err) => {
                tracing::warn!(error = %err, "unreadable session slot");
                self.storage.remove(SESSION_SLOT)?;
                return Err(AppError::Unauthenticated);
            }
        };

        match self.find_user(cached.id).await? {
            Some(user) if user.status => {
                self.store_session(&user)?;
                Ok(user)
            }
            _ => {
                tracing::info!(user_id = cached.id, "session revoked");
                self.storage.remove(SESSION_SLOT)?;
                Err(AppError::Unauthenticated)
            }
        }
    }

    pub async fn register_user(&self, request: RegisterRequest) -> AppResult<User> {
        let role = Role::try_from(request.role)?;

        if self.options.enforce_role_ceiling {
            let current = self.get_current_user().await?;
            if current.rank() < role.rank() {
                return Err(AppError::AuthorizationDenied(
                    "Cannot register user with higher role!".into(),
                ));
            }
        }

        if self
            .store
            .is_exist(Table::Users, "email", &json!(request.email))
            .await?
        {
            return Err(AppError::DuplicateEmail);
        }

        let mut request = request;
        request.password = password::prepare(self.options.password_mode, &request.password)?;
        let row = self.store.add(Table::Users, to_payload(&request)?).await?;
        let user: User = serde_json::from_value(row)?;
        tracing::info!(user_id = user.id, role = role.label(), "user registered");
        Ok(user)
    }

    /// Edits user `id` on behalf of the current user.
    ///
    /// The caller must rank at least as high as the target and as any new
    /// role, and cannot change their own role or status.
    pub async fn edit_user(&self, id: i32, request: EditUserRequest) -> AppResult<User> {
        let new_role = request.role.map(Role::try_from).transpose()?;
        let current = self.get_current_user().await?;
        let target = self.find_user(id).await?.ok_or(AppError::NotFound)?;

        if current.id == target.id && (request.role.is_some() || request.status.is_some()) {
            return Err(AppError::AuthorizationDenied(
                "User cannot change their own role or status!".into(),
            ));
        }
        if current.rank() < target.rank() {
            return Err(AppError::AuthorizationDenied(
                "Cannot edit user with higher role!".into(),
            ));
        }
        if new_role.is_some_and(|role| current.rank() < role.rank()) {
            return Err(AppError::AuthorizationDenied(
                "Cannot assign a role higher than your own!".into(),
            ));
        }

        let mut request = request;
        if let Some(plain) = request.password.take() {
            request.password = Some(password::prepare(self.options.password_mode, &plain)?);
        }
        let row = self.store.edit(Table::Users, id, to_payload(&request)?).await?;
        tracing::info!(user_id = id, by = current.id, "user edited");
        Ok(serde_json::from_value(row)?)
    }

    /// Soft-deletes `target_id` on behalf of the current user.
    ///
    /// Deleting oneself or someone of higher rank is refused, not an error.
    pub async fn delete_user(&self, target_id: i32) -> AppResult<Outcome<User>> {
        let current = self.get_current_user().await?;
        if current.id == target_id {
            return Ok(Outcome::refused("User cannot delete themselves!"));
        }

        let target = self.find_user(target_id).await?.ok_or(AppError::NotFound)?;
        if current.rank() < target.rank() {
            return Ok(Outcome::refused("User cannot delete user with higher role!"));
        }

        self.store.delete_by_id(Table::Users, target_id).await?;
        let deleted = self.find_user(target_id).await?.ok_or(AppError::NotFound)?;
        tracing::info!(user_id = target_id, by = current.id, "user deactivated");
        Ok(Outcome::ok(deleted))
    }

    pub async fn find_user(&self, id: i32) -> AppResult<Option<User>> {
        self.find_user_by("id", json!(id)).await
    }

    async fn find_user_by(&self, field: &str, value: JsonValue) -> AppResult<Option<User>> {
        let rows = self.store.get_by_field(Table::Users, field, &value).await?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    fn store_session(&self, user: &User) -> AppResult<()> {
        self.storage
            .set(SESSION_SLOT, &serde_json::to_string(user)?)
    }
}

fn to_payload<T: Serialize>(value: &T) -> AppResult<Payload> {
    match serde_json::to_value(value)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(AppError::BadRequest(format!("expected an object, got {other}"))),
    }
}
