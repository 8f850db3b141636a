//! Accounts Database Crate
//!
//! Connection management, the embedded migration, the `users` row mapper and
//! the user store adapter.

use accounts_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod mapping;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use repos::UserRepository;

pub use entities::{UnknownRole, User, UserRole};
pub use mapping::{map_user, RowSource};

pub use types::{DatabaseError, DatabaseResult, UserError, UserResult};

pub use sqlx::SqlitePool;

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}
