//! Database migrations

use anyhow::Context;
use sqlx::SqlitePool;
use tracing::info;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("database migrations failed")?;
    info!("database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::prepare_database;
    use accounts_config::DatabaseConfig;
    use sqlx::Row;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_migrations_create_users_table_in_contract_order() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_migrations.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 1,
        };

        let pool = prepare_database(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        // A second run is a no-op
        run_migrations(&pool).await.unwrap();

        let columns: Vec<String> = sqlx::query("SELECT name FROM pragma_table_info('users') ORDER BY cid")
            .fetch_all(&pool)
            .await
            .unwrap()
            .iter()
            .map(|row| row.get::<String, _>("name"))
            .collect();

        assert_eq!(
            columns,
            vec!["id", "email", "role", "sub", "name", "avatar_id", "deleted"]
        );
    }
}
