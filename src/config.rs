//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name left behind by Ollama-WebUI installs.
pub const LEGACY_DB_FILE: &str = "ollama.db";

/// File name of the SQLite database used by the generic engine by default.
pub const DB_FILE: &str = "webui.db";

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATA_DIR` (optional): base directory for on-disk state, defaults to `./data`
/// - `DB_ENGINE` (optional): `postgres` selects the postgres engine, anything else the URL engine
/// - `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT`, `DB_SCHEMA`: postgres parameters
/// - `DATABASE_URL` (optional): connection string for the URL engine, defaults to SQLite under `DATA_DIR`
/// - `MIGRATIONS_DIR` (optional): defaults to `migrations`
/// - `DB_POOL_SIZE`, `DB_POOL_TIMEOUT` (optional): pool sizing, 5 connections and 30 seconds
/// - `DB_LOG_LEVEL` (optional): log level for the database module
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8080
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub db_engine: DbEngine,

    #[serde(default = "default_db_name")]
    pub db_name: String,

    #[serde(default = "default_db_user")]
    pub db_user: String,

    pub db_password: Option<String>,

    #[serde(default = "default_db_host")]
    pub db_host: String,

    #[serde(default = "default_db_port")]
    pub db_port: u16,

    pub db_schema: Option<String>,

    pub database_url: Option<String>,

    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: PathBuf,

    #[serde(default = "default_pool_size")]
    pub db_pool_size: u32,

    /// Seconds to wait for a pooled connection, including the initial connect.
    #[serde(default = "default_pool_timeout")]
    pub db_pool_timeout: u64,

    pub db_log_level: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,
}

/// Database engine selected by `DB_ENGINE`.
///
/// `"postgres"` is the only recognised value; everything else (including an
/// unset or empty variable) falls through to the generic URL engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DbEngine {
    Postgres,
    #[default]
    Url,
}

impl From<String> for DbEngine {
    fn from(value: String) -> Self {
        match value.as_str() {
            "postgres" => DbEngine::Postgres,
            _ => DbEngine::Url,
        }
    }
}

impl DbEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbEngine::Postgres => "postgres",
            DbEngine::Url => "url",
        }
    }
}

/// Structured connection parameters for the postgres engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresParams {
    pub name: String,
    pub user: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub schema: Option<String>,
}

/// Engine selection together with the parameters that engine needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineConfig {
    Postgres(PostgresParams),
    Url(String),
}

/// Pool sizing shared by both engines.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_db_name() -> String {
    "webui".to_string()
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_migrations_dir() -> PathBuf {
    PathBuf::from("migrations")
}

fn default_pool_size() -> u32 {
    5
}

fn default_pool_timeout() -> u64 {
    30
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into expected types
    /// (e.g. a non-numeric `DB_PORT`).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }

    /// Build a configuration from explicit `(NAME, value)` pairs instead of the process environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
    }

    /// Resolve the engine selector and the parameters it uses.
    pub fn engine(&self) -> EngineConfig {
        match self.db_engine {
            DbEngine::Postgres => EngineConfig::Postgres(PostgresParams {
                name: self.db_name.clone(),
                user: self.db_user.clone(),
                password: self.db_password.clone(),
                host: self.db_host.clone(),
                port: self.db_port,
                schema: self.db_schema.clone(),
            }),
            DbEngine::Url => EngineConfig::Url(self.database_url()),
        }
    }

    /// `DATABASE_URL`, or a SQLite database at `<DATA_DIR>/webui.db` created on first use.
    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!("sqlite://{}?mode=rwc", self.db_path().display()),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        db_path(&self.data_dir)
    }

    pub fn pool(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_pool_size,
            acquire_timeout_secs: self.db_pool_timeout,
        }
    }
}

pub fn legacy_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LEGACY_DB_FILE)
}

pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILE)
}
