// SQLite Connection Pool Setup

use crate::config::StoreConfig;
use crate::error::map_sqlx_error;
use roster_core::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::debug;

/// Create SQLite connection pool with WAL mode and default settings
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let config = StoreConfig {
        database_url: database_url.to_string(),
        ..StoreConfig::default()
    };
    create_pool_with(&config).await
}

/// Create SQLite connection pool from a loaded `StoreConfig`
pub async fn create_pool_with(config: &StoreConfig) -> Result<SqlitePool> {
    let in_memory = is_in_memory(&config.database_url);

    let mut options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(map_sqlx_error)?
        .busy_timeout(config.busy_timeout())
        .foreign_keys(true)
        .create_if_missing(true);

    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    // Every connection to `:memory:` opens its own empty database,
    // so an in-memory pool is pinned to a single connection that never expires.
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)?;

    debug!(
        database_url = %config.database_url,
        in_memory = in_memory,
        "SQLite pool ready"
    );

    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
