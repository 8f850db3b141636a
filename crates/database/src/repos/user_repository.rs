//! User repository for database operations.

use chrono::Utc;
use futures_util::stream::{self, BoxStream, StreamExt};
use sqlx::SqlitePool;
use tracing::debug;

use crate::entities::{User, UserRole};
use crate::mapping::{map_user, RowSource};
use crate::types::{UserError, UserResult};

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find user by email. Soft-deleted rows are returned as well.
    pub async fn find_by_email(&self, email: &str) -> UserResult<User> {
        let row = sqlx::query(
            "SELECT id, email, role, sub, name, avatar_id, deleted FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await;

        map_user(RowSource::Single(row))
    }

    /// Insert a new user and return the stored row.
    ///
    /// There is no prior existence check here: a concurrent insert of the same
    /// email fails on the unique constraint with [`UserError::EmailAlreadyExists`].
    pub async fn create_if_absent(&self, email: &str, role: UserRole, sub: &str) -> UserResult<User> {
        let row = sqlx::query(
            "INSERT INTO users (email, role, sub) VALUES (?, ?, ?) \
             RETURNING id, email, role, sub, name, avatar_id, deleted",
        )
        .bind(email)
        .bind(role.as_str())
        .bind(sub)
        .fetch_one(&self.pool)
        .await;

        map_user(RowSource::Single(row))
    }

    /// Stream every user whose id is in `ids`, in whatever order the store yields them.
    ///
    /// The cursor stays open until the returned stream is exhausted or dropped.
    pub fn find_by_ids<'a>(&'a self, ids: &[String]) -> BoxStream<'a, UserResult<User>> {
        let encoded = match serde_json::to_string(ids) {
            Ok(encoded) => encoded,
            Err(err) => {
                return stream::once(async move { Err(UserError::InvalidRow(err.to_string())) })
                    .boxed();
            }
        };

        sqlx::query(
            "SELECT id, email, role, sub, name, avatar_id, deleted FROM users \
             WHERE id IN (SELECT value FROM json_each(?))",
        )
        .bind(encoded)
        .fetch(&self.pool)
        .map(|row| {
            let row = row?;
            map_user(RowSource::Cursor(&row))
        })
        .boxed()
    }

    /// Find user by ID. Soft-deleted rows are returned as well.
    pub async fn find_by_id(&self, id: &str) -> UserResult<User> {
        let row = sqlx::query(
            "SELECT id, email, role, sub, name, avatar_id, deleted FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;

        map_user(RowSource::Single(row))
    }

    /// Set name and avatar on a live user. Returns the number of rows touched,
    /// which is zero for unknown or soft-deleted ids.
    pub async fn update_profile(
        &self,
        name: Option<&str>,
        avatar_id: Option<&str>,
        id: &str,
    ) -> UserResult<u64> {
        let result = sqlx::query(
            "UPDATE users SET name = ?, avatar_id = ? WHERE id = ? AND deleted IS NULL",
        )
        .bind(name)
        .bind(avatar_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        debug!(id, rows = result.rows_affected(), "profile update applied");
        Ok(result.rows_affected())
    }

    /// Mark a user as deleted. Only applies when id, sub and email all match.
    pub async fn soft_delete(&self, id: &str, sub: &str, email: &str) -> UserResult<u64> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE users SET deleted = ? WHERE id = ? AND sub = ? AND email = ?",
        )
        .bind(&now)
        .bind(id)
        .bind(sub)
        .bind(email)
        .execute(&self.pool)
        .await?;

        debug!(id, rows = result.rows_affected(), "soft delete applied");
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::prepare_database;
    use crate::migrations::run_migrations;
    use accounts_config::DatabaseConfig;
    use futures_util::TryStreamExt;
    use tempfile::TempDir;

    async fn create_test_repository() -> (UserRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 1,
        };

        let pool = prepare_database(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        (UserRepository::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let (repo, _temp_dir) = create_test_repository().await;

        let created = repo
            .create_if_absent("ada@example.com", UserRole::User, "auth0|ada")
            .await
            .unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.role, UserRole::User);
        assert_eq!(created.name, None);
        assert!(!created.is_deleted());

        let found = repo.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_find_missing_user_reports_not_found() {
        let (repo, _temp_dir) = create_test_repository().await;

        assert!(repo.find_by_email("nobody@example.com").await.unwrap_err().is_not_found());
        assert!(repo.find_by_id("missing").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_by_store() {
        let (repo, _temp_dir) = create_test_repository().await;

        repo.create_if_absent("ada@example.com", UserRole::User, "a").await.unwrap();
        let err = repo
            .create_if_absent("ada@example.com", UserRole::User, "b")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_find_by_ids_returns_only_matching_rows() {
        let (repo, _temp_dir) = create_test_repository().await;

        let ada = repo.create_if_absent("ada@example.com", UserRole::User, "a").await.unwrap();
        let bob = repo.create_if_absent("bob@example.com", UserRole::User, "b").await.unwrap();
        repo.create_if_absent("eve@example.com", UserRole::User, "e").await.unwrap();

        let ids = vec![ada.id.clone(), bob.id.clone(), "missing".to_string()];
        let mut found: Vec<String> = repo
            .find_by_ids(&ids)
            .map_ok(|user| user.id)
            .try_collect()
            .await
            .unwrap();
        found.sort();

        let mut expected = vec![ada.id, bob.id];
        expected.sort();
        assert_eq!(found, expected);

        let none: Vec<User> = repo.find_by_ids(&[]).try_collect().await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_skips_deleted_users() {
        let (repo, _temp_dir) = create_test_repository().await;

        let user = repo.create_if_absent("ada@example.com", UserRole::User, "a").await.unwrap();
        let touched = repo
            .update_profile(Some("Ada"), Some("avatar-1"), &user.id)
            .await
            .unwrap();
        assert_eq!(touched, 1);

        repo.soft_delete(&user.id, "a", "ada@example.com").await.unwrap();
        let touched = repo
            .update_profile(Some("Eve"), None, &user.id)
            .await
            .unwrap();
        assert_eq!(touched, 0);

        let stored = repo.find_by_id(&user.id).await.unwrap();
        assert_eq!(stored.name.as_deref(), Some("Ada"));
        assert_eq!(stored.avatar_id.as_deref(), Some("avatar-1"));
        assert!(stored.is_deleted());
    }

    #[tokio::test]
    async fn test_soft_delete_requires_full_ownership_match() {
        let (repo, _temp_dir) = create_test_repository().await;

        let user = repo.create_if_absent("ada@example.com", UserRole::User, "a").await.unwrap();

        assert_eq!(repo.soft_delete(&user.id, "other", "ada@example.com").await.unwrap(), 0);
        assert_eq!(repo.soft_delete(&user.id, "a", "eve@example.com").await.unwrap(), 0);
        assert!(!repo.find_by_id(&user.id).await.unwrap().is_deleted());

        assert_eq!(repo.soft_delete(&user.id, "a", "ada@example.com").await.unwrap(), 1);
        assert!(repo.find_by_id(&user.id).await.unwrap().is_deleted());
    }
}
