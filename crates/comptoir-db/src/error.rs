//! # Storage Errors
//!
//! Failures of the durable local store. These always surface to the caller;
//! nothing in this crate retries or swallows them.

use comptoir_core::Collection;
use thiserror::Error;

/// Durable store operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Record not found.
    #[error("{collection} record not found: {id}")]
    NotFound { collection: String, id: String },

    /// Database could not be opened.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed (constraint, corruption, I/O).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed to begin or commit.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A payload could not be encoded or a stored payload could not be read
    /// back as the expected record kind.
    #[error("Invalid {collection} payload: {message}")]
    Serialization { collection: String, message: String },

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl StorageError {
    pub fn not_found(collection: Collection, id: impl Into<String>) -> Self {
        StorageError::NotFound {
            collection: collection.name().to_string(),
            id: id.into(),
        }
    }

    pub fn serialization(collection: Collection, err: serde_json::Error) -> Self {
        StorageError::Serialization {
            collection: collection.name().to_string(),
            message: err.to_string(),
        }
    }
}

/// Convert sqlx errors to StorageError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → StorageError::NotFound
/// sqlx::Error::Database       → StorageError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StorageError::PoolExhausted
/// sqlx::Error::PoolClosed     → StorageError::ConnectionFailed
/// Other                       → StorageError::Internal
/// ```
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound {
                collection: "record".to_string(),
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => StorageError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StorageError::PoolExhausted,
            sqlx::Error::PoolClosed => StorageError::ConnectionFailed("Pool is closed".to_string()),
            _ => StorageError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StorageError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;
