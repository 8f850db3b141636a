//! Database connection management

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tokio::fs;
use tracing::info;
use accounts_config::DatabaseConfig;

/// Prepare and establish a database connection
pub async fn prepare_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    ensure_sqlite_directory(&config.url).await?;

    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("invalid database url {}", config.url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        // Prevents "database is locked" errors under concurrent writers
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to database {}", config.url))?;

    info!(url = %config.url, "database connection established");
    Ok(pool)
}

/// Ensure the parent directory of an on-disk SQLite database exists
async fn ensure_sqlite_directory(url: &str) -> Result<()> {
    let Some(sqlite_path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };

    let sqlite_path = sqlite_path.split('?').next().unwrap_or_default();
    if sqlite_path.is_empty() || sqlite_path == ":memory:" {
        return Ok(());
    }

    let path = Path::new(sqlite_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create sqlite directory {}", parent.display())
            })?;
        }
    }

    Ok(())
}
