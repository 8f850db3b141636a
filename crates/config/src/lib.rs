use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "accounts.toml",
    "config/accounts.toml",
    "crates/config/accounts.toml",
    "../accounts.toml",
    "../config/accounts.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub rpc: RpcConfig,
    pub database: DatabaseConfig,
}

/// Listener for the remote-procedure surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub address: String,
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 50051,
        }
    }
}

impl RpcConfig {
    /// `address:port` as accepted by `TcpListener::bind`.
    ///
    /// ```
    /// use accounts_config::RpcConfig;
    ///
    /// assert_eq!(RpcConfig::default().bind_address(), "127.0.0.1:50051");
    /// ```
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://accounts.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use accounts_config::load;
///
/// std::env::remove_var("ACCOUNTS_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.rpc.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("rpc.address", defaults.rpc.address.clone())?
        .set_default("rpc.port", i64::from(defaults.rpc.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?;

    let environment_overrides = config::Environment::with_prefix("ACCOUNTS").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("ACCOUNTS_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via ACCOUNTS_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.database.max_connections == 0 {
        config.database.max_connections = 1;
    }

    debug!(?config, "loaded accounts configuration");
    Ok(config)
}
