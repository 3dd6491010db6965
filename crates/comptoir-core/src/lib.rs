//! # comptoir-core: Domain Model for Comptoir
//!
//! Pure types and rules shared by the store, the sync gateway and the
//! application context. Nothing in this crate touches the disk or the network.
//!
//! ## Module Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         comptoir-core                                   │
//! │                                                                         │
//! │  types.rs      Company, User, Product, Sale, Client, Supplier, ...     │
//! │  entity.rs     Collection enum + Entity trait (id, companyId, kind)    │
//! │  tenant.rs     TenantScope + the single visibility filter              │
//! │  money.rs      Money (smallest currency unit) + tax math               │
//! │  pricing.rs    discount / promotional price rules, cart totals         │
//! │  validation.rs input checks run before anything is persisted           │
//! │  seed.rs       canonical first-run data set                            │
//! │  ids.rs        identifier generation                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod entity;
pub mod error;
pub mod ids;
pub mod money;
pub mod pricing;
pub mod seed;
pub mod tenant;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use entity::{Collection, Entity, QueueOperation, SyncQueueEntry};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{CartTotals, PricingChoice};
pub use seed::SeedSet;
pub use tenant::{scoped, TenantScope};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in a cart or an order.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Amount spent (in the smallest currency unit) that earns one loyalty point.
pub const LOYALTY_POINT_UNIT: i64 = 1000;

/// Minimum length of a settings PIN and of a password for password-less users.
pub const MIN_SECRET_LENGTH: usize = 4;

/// Tax rate applied to newly created companies (18 %).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1800;

/// Currency symbol applied to newly created companies.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "FCFA";

/// Theme color applied to newly created companies.
pub const DEFAULT_THEME_COLOR: &str = "blue";
