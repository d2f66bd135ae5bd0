//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PostRepository, SchemaBootstrap};
use quill_infra::InMemoryPostRepository;
use quill_infra::database::DatabaseConfig;

use crate::config::AppConfig;

/// Fatal startup failures.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to connect to database: {0}")]
    Connect(String),

    #[error("Failed to run migrations: {0}")]
    Migrate(String),

    #[error(transparent)]
    Bootstrap(#[from] quill_core::ports::BootstrapError),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    /// State backed by the in-memory repository.
    pub fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
        }
    }

    /// Build the application state.
    ///
    /// With a database configured, pending migrations are applied and the
    /// schema bootstrap runs before any request is served; either failing
    /// aborts startup.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Self::in_memory());
        };

        let posts = postgres_repository(config, db_config).await?;
        tracing::info!("Application state initialized");

        Ok(Self { posts })
    }
}

/// Install the database-side objects; an error here must abort startup.
#[cfg_attr(not(feature = "postgres"), allow(dead_code))]
async fn bootstrap_schema(bootstrapper: &dyn SchemaBootstrap) -> Result<(), StartupError> {
    let report = bootstrapper.bootstrap().await.inspect_err(|e| {
        tracing::error!(error = %e, "Schema bootstrap failed - refusing to start");
    })?;
    tracing::info!(
        objects = report.installed.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Schema objects in place"
    );
    Ok(())
}

#[cfg(feature = "postgres")]
async fn postgres_repository(
    config: &AppConfig,
    db_config: &DatabaseConfig,
) -> Result<Arc<dyn PostRepository>, StartupError> {
    use migration::{Migrator, MigratorTrait};
    use quill_infra::database::connect;
    use quill_infra::{PostgresPostRepository, PostgresSchemaBootstrapper};

    let db = connect(db_config)
        .await
        .map_err(|e| StartupError::Connect(e.to_string()))?;

    Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Migrate(e.to_string()))?;

    let bootstrapper =
        PostgresSchemaBootstrapper::new(&db).with_lock_key(config.bootstrap_lock_key);
    bootstrap_schema(&bootstrapper).await?;

    Ok(Arc::new(PostgresPostRepository::new(db)))
}

#[cfg(not(feature = "postgres"))]
async fn postgres_repository(
    _config: &AppConfig,
    _db_config: &DatabaseConfig,
) -> Result<Arc<dyn PostRepository>, StartupError> {
    tracing::warn!("DATABASE_URL set but postgres feature disabled - using in-memory repository");
    Ok(Arc::new(InMemoryPostRepository::new()))
}
