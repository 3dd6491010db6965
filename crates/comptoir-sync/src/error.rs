//! # Sync Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Storage      │  │     Remote              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  StorageError   │  │  Unavailable            │ │
//! │  │  MissingDeviceId│  │  (always fatal  │  │  Timeout                │ │
//! │  │  InvalidUrl     │  │   to the call)  │  │  Rejected               │ │
//! │  │  ConfigLoad/Save│  │                 │  │  Malformed              │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Remote failures on the write path never reach the caller as `Err`: the
//! gateway folds them into a [`WriteStatus`](crate::WriteStatus). They
//! surface as errors only from direct remote calls and queue replay.

use comptoir_db::StorageError;
use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Result type alias for remote backend calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// A remote backend call that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The backend could not be reached.
    #[error("Remote unavailable: {0}")]
    Unavailable(String),

    /// The call did not finish within the configured bound.
    #[error("Remote call timed out after {ms} ms")]
    Timeout { ms: u64 },

    /// The backend answered and refused the write.
    #[error("Remote rejected the request: {message}")]
    Rejected { message: String },

    /// The backend returned data that does not decode as the expected kind.
    #[error("Malformed remote data: {0}")]
    Malformed(String),
}

impl RemoteError {
    /// Returns true if trying again later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RemoteError::Unavailable(_) | RemoteError::Timeout { .. })
    }
}

/// Sync error type covering gateway, configuration and replay failures.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid sync configuration.
    #[error("Invalid sync configuration: {0}")]
    InvalidConfig(String),

    /// Missing device ID.
    #[error("Device ID not configured")]
    MissingDeviceId,

    /// Invalid remote URL.
    #[error("Invalid remote URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// The durable local store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// Failed to serialize or deserialize a payload.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    // =========================================================================
    // Remote Errors
    // =========================================================================
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::SerializationFailed(err.to_string())
    }
}

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SyncError {
    /// Returns true if this error is recoverable and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Remote(remote) => remote.is_retryable(),
            SyncError::Storage(StorageError::PoolExhausted) => true,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::MissingDeviceId
                | SyncError::InvalidUrl(_)
                | SyncError::ConfigLoadFailed(_)
                | SyncError::ConfigSaveFailed(_)
        )
    }
}
