// Store configuration
//
// Load order (later sources override earlier ones):
// 1. Built-in defaults
// 2. Optional TOML file
// 3. ROSTER_* environment variables (ROSTER_DATABASE_URL -> database_url)

use config::{Config, Environment, File};
use directories::ProjectDirs;
use roster_core::application::CacheInvalidation;
use roster_core::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
    /// Deadline applied to every transaction opened by the CLI
    pub statement_timeout_ms: Option<u64>,
    pub cache_invalidation: CacheInvalidation,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: 10,
            busy_timeout_ms: 5_000,
            statement_timeout_ms: None,
            cache_invalidation: CacheInvalidation::Manual,
        }
    }
}

impl StoreConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix("ROSTER").try_parsing(true));

        let config: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Config(e.to_string()))?;

        if config.max_connections == 0 {
            return Err(AppError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn statement_timeout(&self) -> Option<Duration> {
        self.statement_timeout_ms.map(Duration::from_millis)
    }
}

/// `<data dir>/roster.db`, or `roster.db` in the working directory when the
/// platform has no home directory
fn default_database_url() -> String {
    match ProjectDirs::from("dev", "roster", "roster") {
        Some(dirs) => format!("sqlite://{}", dirs.data_dir().join("roster.db").display()),
        None => "sqlite://roster.db".to_string(),
    }
}
