//! # Application Configuration
//!
//! Where the store lives, whether the app starts online, and the sync
//! gateway settings.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`COMPTOIR_*`)
//! 2. Sync config file (`sync.toml`, see `comptoir_sync::SyncConfig`)
//! 3. Defaults (this file)

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

use comptoir_db::DbConfig;
use comptoir_sync::SyncConfig;

use crate::error::{ApiError, ApiResult, ErrorCode};

const IN_MEMORY: &str = ":memory:";

/// Application configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite file path, or `:memory:`.
    pub database_path: PathBuf,

    /// Initial value of the connectivity flag.
    pub start_online: bool,

    pub sync: SyncConfig,
}

impl AppConfig {
    /// Builds the configuration from the environment and the sync config file.
    ///
    /// ## Environment Variables
    /// - `COMPTOIR_DB_PATH`: database file (default: platform data dir)
    /// - `COMPTOIR_OFFLINE=1`: start with the connectivity flag off
    pub fn from_env() -> ApiResult<Self> {
        let database_path = match std::env::var("COMPTOIR_DB_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_database_path()?,
        };

        let start_online = !matches!(
            std::env::var("COMPTOIR_OFFLINE").as_deref(),
            Ok("1") | Ok("true")
        );

        let sync = SyncConfig::load(None)?;

        debug!(?database_path, start_online, mode = %sync.mode(), "Configuration loaded");

        Ok(AppConfig {
            database_path,
            start_online,
            sync,
        })
    }

    /// In-memory store, online, default sync settings.
    pub fn in_memory() -> Self {
        AppConfig {
            database_path: PathBuf::from(IN_MEMORY),
            start_online: true,
            sync: SyncConfig::default(),
        }
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn with_sync(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }

    /// Starts with the connectivity flag off.
    pub fn offline(mut self) -> Self {
        self.start_online = false;
        self
    }

    pub fn db_config(&self) -> DbConfig {
        if self.database_path == Path::new(IN_MEMORY) {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path)
        }
    }
}

/// Platform data directory, created if missing.
///
/// - **macOS**: `~/Library/Application Support/com.comptoir.comptoir/comptoir.db`
/// - **Windows**: `%APPDATA%\comptoir\comptoir\data\comptoir.db`
/// - **Linux**: `~/.local/share/comptoir/comptoir.db`
fn default_database_path() -> ApiResult<PathBuf> {
    let dirs = ProjectDirs::from("com", "comptoir", "comptoir").ok_or_else(|| {
        ApiError::new(ErrorCode::ConfigError, "Could not determine app data directory")
    })?;

    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|e| ApiError::new(ErrorCode::ConfigError, e.to_string()))?;

    Ok(data_dir.join("comptoir.db"))
}
