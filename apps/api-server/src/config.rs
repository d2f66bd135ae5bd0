//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use quill_core::ports::DEFAULT_BOOTSTRAP_LOCK_KEY;
use quill_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on the in-memory repository.
    pub database: Option<DatabaseConfig>,
    /// Advisory lock key serializing schema bootstrap across instances.
    pub bootstrap_lock_key: i64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut db = DatabaseConfig::new(url);
            db.max_connections = parse_var("DB_MAX_CONNECTIONS").unwrap_or(db.max_connections);
            db.min_connections = parse_var("DB_MIN_CONNECTIONS").unwrap_or(db.min_connections);
            db.sqlx_logging = env::var("DB_LOG_STATEMENTS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(db.sqlx_logging);
            db
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            bootstrap_lock_key: parse_var("BOOTSTRAP_LOCK_KEY")
                .unwrap_or(DEFAULT_BOOTSTRAP_LOCK_KEY),
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
