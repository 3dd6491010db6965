//! # Sync Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     COMPTOIR_SYNC_MODE=offline                                         │
//! │     COMPTOIR_REMOTE_URL=https://api.example.com                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/comptoir/sync.toml (Linux)                               │
//! │     ~/Library/Application Support/com.comptoir.comptoir/sync.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     SyncMode::Auto, generated device id, 5 s remote timeout            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # sync.toml
//! [device]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//! name = "Caisse 1"
//!
//! [sync]
//! mode = "auto"              # auto | offline
//! remote_url = "https://api.example.com"
//! remote_timeout_ms = 5000
//! drain_batch_size = 100
//! drain_on_reconnect = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Sync Mode
// =============================================================================

/// Whether the gateway may use the remote path at all.
///
/// In `Auto` the connectivity flag decides per call. In `Offline` every
/// call takes the local path regardless of connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    #[default]
    Auto,
    Offline,
}

impl SyncMode {
    /// Returns true if remote calls are allowed.
    pub fn is_sync_enabled(&self) -> bool {
        !matches!(self, SyncMode::Offline)
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncMode::Auto => write!(f, "auto"),
            SyncMode::Offline => write!(f, "offline"),
        }
    }
}

impl std::str::FromStr for SyncMode {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" | "online" => Ok(SyncMode::Auto),
            "offline" | "disabled" => Ok(SyncMode::Offline),
            other => Err(SyncError::InvalidConfig(format!(
                "Unknown sync mode: '{}'. Valid options: auto, offline",
                other
            ))),
        }
    }
}

// =============================================================================
// Device Configuration
// =============================================================================

/// Configuration for this device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Unique device identifier (UUID v4).
    /// Auto-generated on first run if not provided.
    pub id: String,

    /// Human-readable device name (e.g., "Caisse 1").
    #[serde(default = "default_device_name")]
    pub name: String,
}

fn default_device_name() -> String {
    "Comptoir".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            id: Uuid::new_v4().to_string(),
            name: default_device_name(),
        }
    }
}

// =============================================================================
// Sync Settings
// =============================================================================

/// Gateway behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default)]
    pub mode: SyncMode,

    /// Base address of the remote backend, if any.
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Upper bound on a single remote call (milliseconds).
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout_ms: u64,

    /// Queue entries read per drain round.
    #[serde(default = "default_drain_batch_size")]
    pub drain_batch_size: u32,

    /// Replay the sync queue as soon as connectivity returns.
    #[serde(default = "default_true")]
    pub drain_on_reconnect: bool,
}

fn default_remote_timeout() -> u64 {
    5000
}

fn default_drain_batch_size() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            mode: SyncMode::default(),
            remote_url: None,
            remote_timeout_ms: default_remote_timeout(),
            drain_batch_size: default_drain_batch_size(),
            drain_on_reconnect: true,
        }
    }
}

// =============================================================================
// Main Sync Configuration
// =============================================================================

/// Complete sync configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub sync: SyncSettings,
}

impl SyncConfig {
    /// Creates a new config with defaults and a generated device ID.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (sync.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading sync config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load sync config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Sync config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        if self.device.id.trim().is_empty() {
            return Err(SyncError::MissingDeviceId);
        }

        self.remote_url()?;

        if self.sync.remote_timeout_ms == 0 {
            return Err(SyncError::InvalidConfig(
                "remote_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.sync.drain_batch_size == 0 {
            return Err(SyncError::InvalidConfig(
                "drain_batch_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("COMPTOIR_DEVICE_ID") {
            debug!(device_id = %id, "Overriding device ID from environment");
            self.device.id = id;
        }

        if let Ok(name) = std::env::var("COMPTOIR_DEVICE_NAME") {
            self.device.name = name;
        }

        if let Ok(mode) = std::env::var("COMPTOIR_SYNC_MODE") {
            match mode.parse() {
                Ok(parsed) => {
                    debug!(mode = %mode, "Overriding sync mode from environment");
                    self.sync.mode = parsed;
                }
                Err(_) => warn!(mode = %mode, "Unknown sync mode in environment"),
            }
        }

        if let Ok(url) = std::env::var("COMPTOIR_REMOTE_URL") {
            debug!(url = %url, "Overriding remote URL from environment");
            self.sync.remote_url = Some(url);
        }

        if let Ok(timeout) = std::env::var("COMPTOIR_REMOTE_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse::<u64>() {
                self.sync.remote_timeout_ms = ms;
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "comptoir", "comptoir")
            .map(|dirs| dirs.config_dir().join("sync.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn device_id(&self) -> &str {
        &self.device.id
    }

    pub fn mode(&self) -> SyncMode {
        self.sync.mode
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.sync.remote_timeout_ms)
    }

    /// Parses the remote URL. Only `http` and `https` are accepted.
    pub fn remote_url(&self) -> SyncResult<Option<Url>> {
        let Some(raw) = self.sync.remote_url.as_deref() else {
            return Ok(None);
        };

        let url = Url::parse(raw)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SyncError::InvalidUrl(format!(
                "Remote URL must start with http:// or https://, got: {}",
                raw
            )));
        }

        Ok(Some(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_mode_parsing() {
        assert_eq!("auto".parse::<SyncMode>().unwrap(), SyncMode::Auto);
        assert_eq!("OFFLINE".parse::<SyncMode>().unwrap(), SyncMode::Offline);
        assert!("primary".parse::<SyncMode>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert!(!config.device.id.is_empty());
        assert_eq!(config.mode(), SyncMode::Auto);
        assert_eq!(config.remote_timeout(), Duration::from_secs(5));
        assert_eq!(config.sync.drain_batch_size, 100);
        assert!(config.sync.drain_on_reconnect);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SyncConfig::default();

        config.device.id = String::new();
        assert!(matches!(config.validate(), Err(SyncError::MissingDeviceId)));

        config.device.id = "caisse-1".to_string();
        config.sync.remote_url = Some("ws://localhost:8080".to_string());
        assert!(matches!(config.validate(), Err(SyncError::InvalidUrl(_))));

        config.sync.remote_url = Some("not a url".to_string());
        assert!(config.validate().is_err());

        config.sync.remote_url = Some("https://api.example.com/v1".to_string());
        assert!(config.validate().is_ok());

        config.sync.remote_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sync.toml");

        let mut config = SyncConfig::default();
        config.device.name = "Caisse 2".to_string();
        config.sync.mode = SyncMode::Offline;
        config.sync.drain_batch_size = 25;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[device]"));
        assert!(contents.contains("[sync]"));

        let loaded: SyncConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.device.id, config.device.id);
        assert_eq!(loaded.device.name, "Caisse 2");
        assert_eq!(loaded.sync.mode, SyncMode::Offline);
        assert_eq!(loaded.sync.drain_batch_size, 25);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: SyncConfig = toml::from_str(
            r#"
            [device]
            id = "caisse-1"
            "#,
        )
        .unwrap();

        assert_eq!(config.device.name, "Comptoir");
        assert_eq!(config.sync.remote_timeout_ms, 5000);
        assert!(config.sync.remote_url.is_none());
    }
}
