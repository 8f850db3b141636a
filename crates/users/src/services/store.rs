//! The store seam the handlers are written against.

use accounts_database::{User, UserRepository, UserResult, UserRole};
use async_trait::async_trait;
use futures_util::stream::BoxStream;

/// Store operations used by [`UserService`](super::UserService).
///
/// Every call goes straight to the backing store; implementations keep no
/// cached copy of user records between calls.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> UserResult<User>;

    async fn create_if_absent(&self, email: &str, role: UserRole, sub: &str) -> UserResult<User>;

    /// Rows for `ids` in store order. The cursor is released when the stream is dropped.
    fn find_by_ids<'a>(&'a self, ids: &[String]) -> BoxStream<'a, UserResult<User>>;

    async fn find_by_id(&self, id: &str) -> UserResult<User>;

    async fn update_profile(
        &self,
        name: Option<&str>,
        avatar_id: Option<&str>,
        id: &str,
    ) -> UserResult<u64>;

    async fn soft_delete(&self, id: &str, sub: &str, email: &str) -> UserResult<u64>;
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> UserResult<User> {
        UserRepository::find_by_email(self, email).await
    }

    async fn create_if_absent(&self, email: &str, role: UserRole, sub: &str) -> UserResult<User> {
        UserRepository::create_if_absent(self, email, role, sub).await
    }

    fn find_by_ids<'a>(&'a self, ids: &[String]) -> BoxStream<'a, UserResult<User>> {
        UserRepository::find_by_ids(self, ids)
    }

    async fn find_by_id(&self, id: &str) -> UserResult<User> {
        UserRepository::find_by_id(self, id).await
    }

    async fn update_profile(
        &self,
        name: Option<&str>,
        avatar_id: Option<&str>,
        id: &str,
    ) -> UserResult<u64> {
        UserRepository::update_profile(self, name, avatar_id, id).await
    }

    async fn soft_delete(&self, id: &str, sub: &str, email: &str) -> UserResult<u64> {
        UserRepository::soft_delete(self, id, sub, email).await
    }
}
