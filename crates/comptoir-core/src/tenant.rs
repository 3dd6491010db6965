//! # Tenant Partitioning
//!
//! Which records a session may see. The store holds every tenant's data
//! side by side; narrowing "everything" down to "this company" happens here
//! and nowhere else.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  scope                 Company   User               other kinds        │
//! │  ────────────────────  ───────   ─────────────────  ─────────────────  │
//! │  Tenant("1")           all       companyId == "1"   companyId == "1"   │
//! │  Unscoped              all       companyId == None  nothing            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// The active tenant of a session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "companyId")]
pub enum TenantScope {
    /// A company is active.
    Tenant(String),
    /// No company is active (logged out, or a super administrator who has
    /// not picked a company yet).
    #[default]
    Unscoped,
}

impl TenantScope {
    pub fn tenant(company_id: impl Into<String>) -> Self {
        TenantScope::Tenant(company_id.into())
    }

    pub fn from_active(company_id: Option<&str>) -> Self {
        match company_id {
            Some(id) => TenantScope::Tenant(id.to_string()),
            None => TenantScope::Unscoped,
        }
    }

    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            TenantScope::Tenant(id) => Some(id),
            TenantScope::Unscoped => None,
        }
    }
}

/// Returns the subset of `items` visible in `scope`.
pub fn scoped<E: Entity>(items: &[E], scope: &TenantScope) -> Vec<E> {
    items
        .iter()
        .filter(|item| item.visible_in(scope))
        .cloned()
        .collect()
}
