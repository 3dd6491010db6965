//! # Collections and the Entity Trait
//!
//! The store has a fixed set of collections, one per record kind plus the
//! sync queue. [`Entity`] ties each Rust type to its collection and exposes
//! the two fields every generic path needs: the primary key and the tenant.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::tenant::TenantScope;
use crate::types::{
    Client, ClientOrder, Company, Expense, Product, Sale, Supplier, SupplierInvoice,
    SupplierOrder, User,
};

// =============================================================================
// Collection
// =============================================================================

/// A named durable collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Products,
    Sales,
    Clients,
    Suppliers,
    Expenses,
    Companies,
    Users,
    ClientOrders,
    SupplierOrders,
    SupplierInvoices,
    SyncQueue,
}

impl Collection {
    /// Every entity collection, in load order. Excludes the sync queue.
    pub const ENTITIES: [Collection; 10] = [
        Collection::Companies,
        Collection::Users,
        Collection::Products,
        Collection::Sales,
        Collection::Clients,
        Collection::Suppliers,
        Collection::Expenses,
        Collection::ClientOrders,
        Collection::SupplierOrders,
        Collection::SupplierInvoices,
    ];

    /// Persisted collection name, as used on the wire.
    pub const fn name(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Sales => "sales",
            Collection::Clients => "clients",
            Collection::Suppliers => "suppliers",
            Collection::Expenses => "expenses",
            Collection::Companies => "companies",
            Collection::Users => "users",
            Collection::ClientOrders => "clientOrders",
            Collection::SupplierOrders => "supplierOrders",
            Collection::SupplierInvoices => "supplierInvoices",
            Collection::SyncQueue => "syncQueue",
        }
    }

    /// SQLite table backing the collection.
    pub const fn table(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Sales => "sales",
            Collection::Clients => "clients",
            Collection::Suppliers => "suppliers",
            Collection::Expenses => "expenses",
            Collection::Companies => "companies",
            Collection::Users => "users",
            Collection::ClientOrders => "client_orders",
            Collection::SupplierOrders => "supplier_orders",
            Collection::SupplierInvoices => "supplier_invoices",
            Collection::SyncQueue => "sync_queue",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ENTITIES
            .iter()
            .chain(std::iter::once(&Collection::SyncQueue))
            .find(|c| c.name() == s || c.table() == s)
            .copied()
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "collection".to_string(),
                reason: format!("unknown collection '{}'", s),
            })
    }
}

// =============================================================================
// Entity
// =============================================================================

/// A record kind stored in its own collection.
///
/// ## Contract
/// - `id()` is assigned at creation and never changes.
/// - `company_id()` is `None` only for companies and super administrators.
/// - The serde representation is the full record; the store replaces it
///   wholesale on every put.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    /// Human-readable kind, used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn company_id(&self) -> Option<&str>;

    /// Stamps the owning tenant on a record built by a handler.
    fn assign_company(&mut self, company_id: &str);

    /// Whether this record belongs to `scope`.
    ///
    /// Tenant-scoped kinds are visible only inside their own company.
    fn visible_in(&self, scope: &TenantScope) -> bool {
        match (scope.tenant_id(), self.company_id()) {
            (Some(active), Some(owner)) => active == owner,
            _ => false,
        }
    }
}

macro_rules! tenant_entity {
    ($ty:ty, $collection:expr, $kind:literal) => {
        impl Entity for $ty {
            const COLLECTION: Collection = $collection;
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn company_id(&self) -> Option<&str> {
                Some(&self.company_id)
            }

            fn assign_company(&mut self, company_id: &str) {
                self.company_id = company_id.to_string();
            }
        }
    };
}

tenant_entity!(Product, Collection::Products, "Product");
tenant_entity!(Sale, Collection::Sales, "Sale");
tenant_entity!(Client, Collection::Clients, "Client");
tenant_entity!(Supplier, Collection::Suppliers, "Supplier");
tenant_entity!(Expense, Collection::Expenses, "Expense");
tenant_entity!(ClientOrder, Collection::ClientOrders, "ClientOrder");
tenant_entity!(SupplierOrder, Collection::SupplierOrders, "SupplierOrder");
tenant_entity!(SupplierInvoice, Collection::SupplierInvoices, "SupplierInvoice");

impl Entity for Company {
    const COLLECTION: Collection = Collection::Companies;
    const KIND: &'static str = "Company";

    fn id(&self) -> &str {
        &self.id
    }

    fn company_id(&self) -> Option<&str> {
        None
    }

    fn assign_company(&mut self, _company_id: &str) {}

    /// The company list is the tenant list; it is never filtered.
    fn visible_in(&self, _scope: &TenantScope) -> bool {
        true
    }
}

impl Entity for User {
    const COLLECTION: Collection = Collection::Users;
    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn company_id(&self) -> Option<&str> {
        self.company_id.as_deref()
    }

    fn assign_company(&mut self, company_id: &str) {
        self.company_id = Some(company_id.to_string());
    }

    /// Company users show inside their company; tenantless super
    /// administrators show only when no company is active.
    fn visible_in(&self, scope: &TenantScope) -> bool {
        match (scope.tenant_id(), self.company_id()) {
            (Some(active), Some(owner)) => active == owner,
            (None, None) => true,
            _ => false,
        }
    }
}

// =============================================================================
// Sync Queue Entry
// =============================================================================

/// Kind of write waiting to be replayed against the remote backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum QueueOperation {
    Put,
    Delete,
}

impl QueueOperation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            QueueOperation::Put => "put",
            QueueOperation::Delete => "delete",
        }
    }
}

impl FromStr for QueueOperation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "put" => Ok(QueueOperation::Put),
            "delete" => Ok(QueueOperation::Delete),
            other => Err(ValidationError::InvalidFormat {
                field: "operation".to_string(),
                reason: format!("unknown queue operation '{}'", other),
            }),
        }
    }
}

/// A durable record of a write the remote backend has not acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SyncQueueEntry {
    pub id: String,
    pub operation: QueueOperation,
    pub collection: Collection,
    pub entity_id: String,
    /// Full entity JSON for puts, `None` for deletes.
    pub payload: Option<String>,
    pub attempts: i64,
    pub last_error: Option<String>,
    /// Enqueue time, Unix milliseconds. Replay order.
    pub timestamp: i64,
    pub attempted_at: Option<i64>,
}
