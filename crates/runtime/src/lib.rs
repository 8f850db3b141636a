use std::sync::Arc;

use accounts_config::AppConfig;
use accounts_database::{prepare_database, run_migrations, UserRepository};
use accounts_users::UserService;
use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::INFO)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Long-lived handles shared by every request.
#[derive(Clone)]
pub struct AccountServices {
    pub db_pool: SqlitePool,
    pub user_service: Arc<UserService<UserRepository>>,
}

impl AccountServices {
    /// Open the pool and bring the schema up to date.
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = prepare_database(&config.database).await?;
        run_migrations(&db_pool).await?;

        let user_service = Arc::new(UserService::new(db_pool.clone()));
        info!(
            max_connections = config.database.max_connections,
            "account services ready"
        );

        Ok(Self {
            db_pool,
            user_service,
        })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
