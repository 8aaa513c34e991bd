//! Startup error types.
//!
//! Everything here is fatal: `main` propagates these so the process exits
//! before it starts serving requests against an unready database.

use std::path::PathBuf;

/// Errors raised while bringing the database into a ready, migrated state.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// `DATA_DIR` is missing and could not be created.
    #[error("failed to create data directory {}: {source}", .path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Both the legacy file and its rename target exist.
    ///
    /// The rename is refused so `webui.db` is never overwritten.
    #[error(
        "legacy database {} cannot be moved: {} already exists",
        .from.display(),
        .to.display()
    )]
    LegacyTargetExists { from: PathBuf, to: PathBuf },

    /// Renaming the legacy file failed (permissions, cross-device, ...).
    #[error("failed to rename {} to {}: {source}", .from.display(), .to.display())]
    LegacyRename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not open the pool (unreachable host, bad credentials, malformed URL).
    #[error("Database connection failed: {0}")]
    Connect(#[from] sqlx::Error),

    /// The migration runner could not load or apply a migration.
    #[error("Database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
