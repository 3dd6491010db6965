//! # API Error Type
//!
//! Unified error type returned by every handler.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Comptoir                               │
//! │                                                                         │
//! │  Handler (checkout, create_product, ...)                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Validation? ──── ValidationError ──┐                                  │
//! │         │                           │                                   │
//! │  Business rule? ─ CoreError ────────┤                                  │
//! │         │                           ├──► ApiError { code, message }    │
//! │  Store failed? ── StorageError ─────┤         │                        │
//! │         │                           │         ▼                        │
//! │  Gateway/config ─ SyncError ────────┘    error notice in the UI         │
//! │                                                                         │
//! │  Remote failures never reach this type: the gateway reports them as    │
//! │  a write status and the handler turns that into a warning notice.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use comptoir_core::{CoreError, ValidationError};
use comptoir_db::StorageError;
use comptoir_sync::SyncError;

/// Error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "PRICING_CONFLICT",
///   "message": "Escarpins Cuir Noir has both a 10% discount and a promotional price of 500; choose one"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for handler responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found in the active scope
    NotFound,

    /// Input validation failed
    ValidationError,

    /// The durable local store failed
    StorageError,

    /// Business rule violated
    BusinessLogic,

    /// Not enough stock for the requested quantity
    InsufficientStock,

    /// Product carries both a discount and a promotional price
    PricingConflict,

    /// Order status change not allowed
    InvalidTransition,

    /// Not logged in, wrong credentials, or missing role
    Unauthorized,

    /// The action needs an active company
    NoActiveTenant,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn business_logic(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BusinessLogic, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn no_active_tenant() -> Self {
        ApiError::new(ErrorCode::NoActiveTenant, "No company is active")
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts storage errors to API errors.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { collection, id } => ApiError::not_found(&collection, &id),
            StorageError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Local storage is unavailable")
            }
            StorageError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Local storage migration failed")
            }
            StorageError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Storage query failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Local storage operation failed")
            }
            StorageError::TransactionFailed(e) => {
                tracing::error!("Storage transaction failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Local storage transaction failed")
            }
            StorageError::PoolExhausted => {
                ApiError::new(ErrorCode::StorageError, "Local storage is busy")
            }
            StorageError::Serialization { collection, message } => {
                tracing::error!(collection = %collection, "Unreadable record: {}", message);
                ApiError::new(
                    ErrorCode::StorageError,
                    format!("Stored {} data is unreadable", collection),
                )
            }
            StorageError::Internal(e) => {
                tracing::error!("Internal storage error: {}", e);
                ApiError::new(ErrorCode::StorageError, "Local storage operation failed")
            }
        }
    }
}

/// Converts gateway and configuration errors to API errors.
impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        if err.is_config_error() {
            return ApiError::new(ErrorCode::ConfigError, err.to_string());
        }

        match err {
            SyncError::Storage(e) => e.into(),
            SyncError::SerializationFailed(e) => {
                tracing::error!("Payload serialization failed: {}", e);
                ApiError::internal("Record could not be encoded")
            }
            other => ApiError::internal(other.to_string()),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { kind, id } => ApiError::not_found(&kind, &id),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::InvalidTransition { .. } => {
                ApiError::new(ErrorCode::InvalidTransition, err.to_string())
            }
            CoreError::CartTooLarge { .. } | CoreError::EmptyCart => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::Forbidden(message) => ApiError::unauthorized(message),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::PricingConflict { .. } => {
                ApiError::new(ErrorCode::PricingConflict, err.to_string())
            }
            other => ApiError::validation(other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;
