//! Database bootstrap: legacy file migration, engine selection, connection pool and schema migrations.
//!
//! [`bootstrap`] runs once at startup, before the HTTP server is built, and
//! returns the [`Database`] handle that the rest of the application shares.
//!
//! # Startup Flow
//!
//! 1. Create `<DATA_DIR>` if missing, then rename `<DATA_DIR>/ollama.db` to `<DATA_DIR>/webui.db` if it exists
//! 2. Connect with the engine chosen by `DB_ENGINE`
//! 3. URL engine only: apply pending migrations, then confirm the connection
//!
//! The postgres engine does not run the migration runner. Its schema is
//! expected to be managed outside this process.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use sqlx::{
    AnyPool, PgPool,
    any::AnyPoolOptions,
    migrate::{MigrateError, Migrator},
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::Instrument;

use crate::config::{self, Config, DbEngine, EngineConfig, PoolSettings, PostgresParams};
use crate::error::BootstrapError;

/// The application's connection handle.
///
/// Both variants wrap a reference-counted pool, so cloning is cheap and every
/// clone shares the same connections.
#[derive(Debug, Clone)]
pub enum Database {
    /// Pool opened from the structured `DB_*` parameters.
    Postgres(PgPool),

    /// Pool opened from `DATABASE_URL` through the runtime-dispatched `Any` driver.
    Url {
        pool: AnyPool,
        /// Backend reported by the driver (e.g. `SQLite`, `PostgreSQL`, `MySQL`).
        backend: String,
    },
}

impl Database {
    pub fn engine(&self) -> DbEngine {
        match self {
            Database::Postgres(_) => DbEngine::Postgres,
            Database::Url { .. } => DbEngine::Url,
        }
    }

    pub fn backend_name(&self) -> &str {
        match self {
            Database::Postgres(_) => "PostgreSQL",
            Database::Url { backend, .. } => backend,
        }
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        match self {
            Database::Postgres(pool) => pool.close().await,
            Database::Url { pool, .. } => pool.close().await,
        }
    }
}

/// Applies pending schema migrations.
///
/// Injected into [`bootstrap`] so tests can observe or replace the runner.
pub trait MigrationRunner {
    fn run(
        &self,
        pool: &AnyPool,
        migrations_dir: &Path,
    ) -> impl Future<Output = Result<(), MigrateError>> + Send;
}

/// Runs the SQL migrations found in a directory with sqlx's migrator.
///
/// Migration files must be named `<version>_<description>.sql`. Applied
/// versions are tracked in the `_sqlx_migrations` table, so each migration
/// runs only once.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlxMigrator;

impl MigrationRunner for SqlxMigrator {
    async fn run(&self, pool: &AnyPool, migrations_dir: &Path) -> Result<(), MigrateError> {
        let migrator = Migrator::new(migrations_dir).await?;
        tracing::debug!(available = migrator.iter().count(), "Loaded migrations");
        migrator.run(pool).await
    }
}

/// Bring the database into a ready state and return the shared handle.
///
/// # Errors
///
/// Every failure is fatal to startup:
/// - the data directory cannot be created
/// - the legacy file cannot be renamed
/// - the database cannot be reached or rejects the credentials
/// - the migration runner fails (URL engine only)
pub async fn bootstrap<M>(config: &Config, runner: &M) -> Result<Database, BootstrapError>
where
    M: MigrationRunner,
{
    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .map_err(|source| BootstrapError::DataDir {
            path: config.data_dir.clone(),
            source,
        })?;
    migrate_legacy_file(&config.data_dir).await?;

    let settings = config.pool();
    match config.engine() {
        EngineConfig::Postgres(params) => {
            let pool = connect_postgres(&params, settings).await?;
            Ok(Database::Postgres(pool))
        }
        EngineConfig::Url(url) => {
            let (pool, backend) = connect_url(&url, settings).await?;

            let span = tracing::info_span!(
                "migrations",
                dir = %config.migrations_dir.display()
            );
            runner
                .run(&pool, &config.migrations_dir)
                .instrument(span)
                .await?;

            // Reuses an idle pooled connection when one is open.
            pool.acquire().await?;

            Ok(Database::Url { pool, backend })
        }
    }
}

/// Rename `<data_dir>/ollama.db` to `<data_dir>/webui.db` if the former exists.
///
/// Returns `true` when a rename happened. Refuses to overwrite an existing
/// `webui.db`.
pub async fn migrate_legacy_file(data_dir: &Path) -> Result<bool, BootstrapError> {
    let from = config::legacy_db_path(data_dir);
    let to = config::db_path(data_dir);
    let io_error = |source| BootstrapError::LegacyRename {
        from: from.clone(),
        to: to.clone(),
        source,
    };

    if !tokio::fs::try_exists(&from).await.map_err(io_error)? {
        return Ok(false);
    }
    if tokio::fs::try_exists(&to).await.map_err(io_error)? {
        return Err(BootstrapError::LegacyTargetExists {
            from: from.clone(),
            to: to.clone(),
        });
    }
    tokio::fs::rename(&from, &to).await.map_err(io_error)?;

    tracing::info!("Database migrated from Ollama-WebUI successfully.");
    Ok(true)
}

/// Connection options for the postgres engine.
///
/// The schema, when set, becomes the session `search_path`.
pub fn postgres_options(params: &PostgresParams) -> PgConnectOptions {
    let mut options = PgConnectOptions::new()
        .host(&params.host)
        .port(params.port)
        .username(&params.user)
        .database(&params.name);

    if let Some(password) = &params.password {
        options = options.password(password);
    }
    if let Some(schema) = params.schema.as_deref().filter(|s| !s.is_empty()) {
        options = options.options([("search_path", schema)]);
    }

    options
}

/// Open the postgres pool. A single connection attempt is made, bounded by
/// the pool's acquire timeout.
pub async fn connect_postgres(
    params: &PostgresParams,
    settings: PoolSettings,
) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        host = %params.host,
        port = params.port,
        database = %params.name,
        "Connecting to postgres"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect_with(postgres_options(params))
        .await
}

/// Open a pool from a connection URL and resolve which backend it speaks.
pub async fn connect_url(
    url: &str,
    settings: PoolSettings,
) -> Result<(AnyPool, String), sqlx::Error> {
    sqlx::any::install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(url)
        .await?;

    let backend = pool.acquire().await?.backend_name().to_string();
    tracing::info!("Connected to a {} database.", backend);

    Ok((pool, backend))
}
