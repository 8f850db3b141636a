//! In-memory store for exercising the handlers without a database

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use accounts_database::{User, UserError, UserResult, UserRole};
use async_trait::async_trait;
use chrono::Utc;
use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::sync::RwLock;

use super::store::UserStore;

/// Mock user store for testing
#[derive(Default)]
pub struct MockUserStore {
    users: RwLock<Vec<User>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    open_cursors: Arc<AtomicUsize>,
    fail_cursor_after: Option<usize>,
}

impl MockUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `find_by_ids` cursor fail after yielding `rows` rows.
    pub fn with_cursor_failure_after(mut self, rows: usize) -> Self {
        self.fail_cursor_after = Some(rows);
        self
    }

    /// Insert a row as-is, bypassing the store operations.
    pub async fn seed(&self, user: User) {
        self.users.write().await.push(user);
    }

    pub async fn get(&self, id: &str) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Number of store operations issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of `find_by_ids` cursors that have not been dropped yet.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

struct CursorGuard(Arc<AtomicUsize>);

impl CursorGuard {
    fn open(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn find_by_email(&self, email: &str) -> UserResult<User> {
        self.record_call();
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(UserError::UserNotFound)
    }

    async fn create_if_absent(&self, email: &str, role: UserRole, sub: &str) -> UserResult<User> {
        self.record_call();
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(UserError::EmailAlreadyExists(
                "UNIQUE constraint failed: users.email".to_string(),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = User {
            id: format!("user-{id}"),
            email: email.to_string(),
            role,
            sub: sub.to_string(),
            name: None,
            avatar_id: None,
            deleted: None,
        };
        users.push(user.clone());
        Ok(user)
    }

    fn find_by_ids<'a>(&'a self, ids: &[String]) -> BoxStream<'a, UserResult<User>> {
        self.record_call();
        let ids = ids.to_vec();
        let fail_after = self.fail_cursor_after;
        let guard = CursorGuard::open(Arc::clone(&self.open_cursors));

        stream::once(async move {
            let users = self.users.read().await;
            let mut rows: Vec<UserResult<User>> = users
                .iter()
                .filter(|u| ids.contains(&u.id))
                .cloned()
                .map(Ok)
                .collect();
            if let Some(limit) = fail_after {
                rows.truncate(limit);
                rows.push(Err(UserError::DatabaseError(sqlx::Error::Protocol(
                    "cursor interrupted".to_string(),
                ))));
            }
            rows
        })
        .flat_map(stream::iter)
        .map(move |row| {
            let _cursor = &guard;
            row
        })
        .boxed()
    }

    async fn find_by_id(&self, id: &str) -> UserResult<User> {
        self.record_call();
        self.get(id).await.ok_or(UserError::UserNotFound)
    }

    async fn update_profile(
        &self,
        name: Option<&str>,
        avatar_id: Option<&str>,
        id: &str,
    ) -> UserResult<u64> {
        self.record_call();
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.id == id && u.deleted.is_none()) else {
            return Ok(0);
        };
        user.name = name.map(str::to_string);
        user.avatar_id = avatar_id.map(str::to_string);
        Ok(1)
    }

    async fn soft_delete(&self, id: &str, sub: &str, email: &str) -> UserResult<u64> {
        self.record_call();
        let mut users = self.users.write().await;
        let Some(user) = users
            .iter_mut()
            .find(|u| u.id == id && u.sub == sub && u.email == email)
        else {
            return Ok(0);
        };
        user.deleted = Some(Utc::now().to_rfc3339());
        Ok(1)
    }
}
