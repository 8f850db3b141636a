//! Shared application state for the gateway

use std::sync::Arc;

use accounts_config::DatabaseConfig;
use accounts_users::{UserRepository, UserService};
use sqlx::SqlitePool;

use crate::error::{GatewayError, GatewayResult};

/// Shared application state containing the handlers
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    /// Account operation handlers
    pub user_service: Arc<UserService<UserRepository>>,
}

impl GatewayState {
    pub fn new(pool: SqlitePool) -> Self {
        let user_service = Arc::new(UserService::new(pool.clone()));
        Self { pool, user_service }
    }

    /// Create gateway state from database configuration, applying migrations
    pub async fn from_config(config: &DatabaseConfig) -> GatewayResult<Self> {
        let pool = accounts_database::initialize_database(config)
            .await
            .map_err(|e| GatewayError::Internal(format!("Failed to initialize database: {e}")))?;

        Ok(Self::new(pool))
    }
}
