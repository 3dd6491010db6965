//! Identifier generation.
//!
//! Records get UUID v4 identifiers so that devices creating records offline
//! never collide, across collections or tenants. Order and invoice numbers
//! carry a readable prefix.

use uuid::Uuid;

/// A fresh record identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A fresh identifier with a business prefix, e.g. `CMD-3f2a…`.
pub fn prefixed_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Prefix of client order identifiers.
pub const CLIENT_ORDER_PREFIX: &str = "CMD";

/// Prefix of supplier order identifiers.
pub const SUPPLIER_ORDER_PREFIX: &str = "PO";

/// Prefix of supplier invoice identifiers.
pub const SUPPLIER_INVOICE_PREFIX: &str = "INV-SUP";
