//! Request handlers for the accounts service.

use std::time::Instant;

use accounts_database::{User, UserError, UserRepository, UserRole};
use futures_util::StreamExt;
use sqlx::sqlite::SqlitePool;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::store::UserStore;
use crate::types::{
    AuthRequest, DeleteUserRequest, Empty, ServiceError, ServiceResult, UpdateUserRequest,
    UserId, UserIds,
};
use crate::utils::validation::Validate;

/// Channel a streamed `GetUsers` response is delivered through.
pub type UserSender = mpsc::Sender<ServiceResult<User>>;

/// Handlers for the five account operations.
///
/// Holds nothing but the injected store, so concurrent calls share no mutable state.
pub struct UserService<S> {
    store: S,
}

impl UserService<UserRepository> {
    /// Create a new user service backed by the database
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_store(UserRepository::new(pool))
    }
}

impl<S> UserService<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> UserService<S>
where
    S: UserStore,
{
    /// Return the account for `email`, creating it on first sight.
    ///
    /// Soft-deleted accounts are rejected with [`ServiceError::Unauthenticated`].
    pub async fn auth(&self, request: AuthRequest) -> ServiceResult<User> {
        const OPERATION: &str = "Auth";
        let start = Instant::now();
        check(OPERATION, &request)?;

        let user = match self.store.find_by_email(&request.email).await {
            Ok(user) if user.is_deleted() => {
                warn!(
                    operation = OPERATION,
                    user_id = %user.id,
                    elapsed = ?start.elapsed(),
                    "rejected soft-deleted account"
                );
                return Err(ServiceError::Unauthenticated);
            }
            Ok(user) => user,
            Err(UserError::UserNotFound) => self
                .store
                .create_if_absent(&request.email, UserRole::User, &request.sub)
                .await
                .map_err(|error| store_failure(OPERATION, start, "create_if_absent", error))?,
            Err(error) => return Err(store_failure(OPERATION, start, "find_by_email", error)),
        };

        completed(OPERATION, start);
        Ok(user)
    }

    /// Deliver every matching user through `sender`, in store order.
    ///
    /// Stops at the first mapping or send failure. Users sent before the failure stay sent.
    pub async fn get_users(&self, request: UserIds, sender: &UserSender) -> ServiceResult<()> {
        const OPERATION: &str = "GetUsers";
        let start = Instant::now();
        check(OPERATION, &request)?;

        let mut rows = self.store.find_by_ids(&request.user_ids);
        let mut delivered = 0usize;

        while let Some(row) = rows.next().await {
            let user = row.map_err(|error| store_failure(OPERATION, start, "find_by_ids", error))?;
            if sender.send(Ok(user)).await.is_err() {
                error!(
                    operation = OPERATION,
                    delivered,
                    elapsed = ?start.elapsed(),
                    "stream receiver dropped"
                );
                return Err(ServiceError::StreamClosed);
            }
            delivered += 1;
        }

        info!(operation = OPERATION, delivered, elapsed = ?start.elapsed(), "request completed");
        Ok(())
    }

    pub async fn get_user(&self, request: UserId) -> ServiceResult<User> {
        const OPERATION: &str = "GetUser";
        let start = Instant::now();
        check(OPERATION, &request)?;

        let user = self
            .store
            .find_by_id(&request.user_id)
            .await
            .map_err(|error| store_failure(OPERATION, start, "find_by_id", error))?;

        completed(OPERATION, start);
        Ok(user)
    }

    /// Write name and avatar. Succeeds even when no live user has this id.
    pub async fn update_user(&self, request: UpdateUserRequest) -> ServiceResult<Empty> {
        const OPERATION: &str = "UpdateUser";
        let start = Instant::now();
        check(OPERATION, &request)?;

        let rows = self
            .store
            .update_profile(
                request.name.as_deref(),
                request.avatar_id.as_deref(),
                &request.id,
            )
            .await
            .map_err(|error| store_failure(OPERATION, start, "update_profile", error))?;

        if rows == 0 {
            debug!(operation = OPERATION, user_id = %request.id, "no live user matched");
        }

        completed(OPERATION, start);
        Ok(Empty {})
    }

    /// Soft-delete the user. Succeeds even when id, sub and email do not all match.
    pub async fn delete_user(&self, request: DeleteUserRequest) -> ServiceResult<Empty> {
        const OPERATION: &str = "DeleteUser";
        let start = Instant::now();
        check(OPERATION, &request)?;

        let rows = self
            .store
            .soft_delete(&request.id, &request.sub, &request.email)
            .await
            .map_err(|error| store_failure(OPERATION, start, "soft_delete", error))?;

        if rows == 0 {
            debug!(operation = OPERATION, user_id = %request.id, "ownership triple matched nothing");
        }

        completed(OPERATION, start);
        Ok(Empty {})
    }
}

fn check<R: Validate>(operation: &'static str, request: &R) -> ServiceResult<()> {
    request.validate().map_err(|error| {
        warn!(operation, %error, "request failed validation");
        ServiceError::InvalidArgument(R::REJECTION)
    })
}

fn store_failure(
    operation: &'static str,
    start: Instant,
    step: &'static str,
    error: UserError,
) -> ServiceError {
    let elapsed = start.elapsed();
    match &error {
        UserError::UserNotFound => {
            warn!(operation, step, ?elapsed, %error, "no matching user");
        }
        UserError::EmailAlreadyExists(_) => {
            warn!(operation, step, ?elapsed, %error, "concurrent create lost the race on email");
        }
        _ => {
            error!(operation, step, ?elapsed, %error, "store operation failed");
        }
    }
    ServiceError::Store(error)
}

fn completed(operation: &'static str, start: Instant) {
    info!(operation, elapsed = ?start.elapsed(), "request completed");
}
