//! # Error Types
//!
//! Domain errors raised before anything reaches the store.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  comptoir-core   CoreError, ValidationError   (this file)               │
//! │  comptoir-db     StorageError                                           │
//! │  comptoir-sync   SyncError, RemoteError                                 │
//! │  apps/comptoir   ApiError  (what the UI sees, serialized)               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI notice              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record the operation depends on is not visible in the active scope.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// Not enough stock to cover the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: "MacBook Air M2" × 6
    ///      │
    ///      ▼
    /// Check stock: available = 5
    ///      │
    ///      ▼
    /// InsufficientStock { product: "MacBook Air M2", available: 5, requested: 6 }
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// An order was asked to move out of a state that does not allow it.
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: String,
        from: String,
        to: String,
    },

    /// Cart has reached its maximum number of lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// The cart has no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// The action requires a role the current user does not have.
    #[error("Not allowed: {0}")]
    Forbidden(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity kind and ID.
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Product carries both a percentage discount and a promotional price.
    ///
    /// The caller must pick one with [`crate::PricingChoice`] before saving.
    #[error("{product} has both a {discount}% discount and a promotional price of {promotional_price}; choose one")]
    PricingConflict {
        product: String,
        discount: u32,
        promotional_price: i64,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
