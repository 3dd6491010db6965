//! # Application State Cache
//!
//! In-memory projection of the store, loaded once through the sync gateway
//! and kept in step with every write a handler makes.
//!
//! ## Raw vs Scoped
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         StateCache                                      │
//! │                                                                         │
//! │  raw: Collections          every record of every tenant                 │
//! │        │                                                                │
//! │        │  scoped(raw, scope)    (the only filter, comptoir-core)        │
//! │        ▼                                                                │
//! │  views: Collections        what the active tenant may see               │
//! │                                                                         │
//! │  upsert / remove  ──► recompute the view of that kind                  │
//! │  set_scope        ──► recompute every view                             │
//! │                                                                         │
//! │  Views are rebuilt eagerly, so a stale cross-tenant view cannot        │
//! │  outlive a tenant switch.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use comptoir_core::{
    scoped, Client, ClientOrder, Company, Entity, Expense, Product, Sale, Supplier,
    SupplierInvoice, SupplierOrder, TenantScope, User,
};
use comptoir_sync::{RemoteBackend, SyncGateway, SyncResult};

/// One vector per entity kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub companies: Vec<Company>,
    pub users: Vec<User>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub clients: Vec<Client>,
    pub suppliers: Vec<Supplier>,
    pub expenses: Vec<Expense>,
    pub client_orders: Vec<ClientOrder>,
    pub supplier_orders: Vec<SupplierOrder>,
    pub supplier_invoices: Vec<SupplierInvoice>,
}

impl Collections {
    /// Reads every collection through the gateway, concurrently.
    pub async fn fetch<R: RemoteBackend>(gateway: &SyncGateway<R>) -> SyncResult<Self> {
        let (
            companies,
            users,
            products,
            sales,
            clients,
            suppliers,
            expenses,
            client_orders,
            supplier_orders,
            supplier_invoices,
        ) = tokio::try_join!(
            gateway.get_companies(),
            gateway.get_users(),
            gateway.get_products(),
            gateway.get_sales(),
            gateway.get_clients(),
            gateway.get_suppliers(),
            gateway.get_expenses(),
            gateway.get_client_orders(),
            gateway.get_supplier_orders(),
            gateway.get_supplier_invoices(),
        )?;

        Ok(Collections {
            companies,
            users,
            products,
            sales,
            clients,
            suppliers,
            expenses,
            client_orders,
            supplier_orders,
            supplier_invoices,
        })
    }

    fn scoped(&self, scope: &TenantScope) -> Self {
        Collections {
            companies: scoped(&self.companies, scope),
            users: scoped(&self.users, scope),
            products: scoped(&self.products, scope),
            sales: scoped(&self.sales, scope),
            clients: scoped(&self.clients, scope),
            suppliers: scoped(&self.suppliers, scope),
            expenses: scoped(&self.expenses, scope),
            client_orders: scoped(&self.client_orders, scope),
            supplier_orders: scoped(&self.supplier_orders, scope),
            supplier_invoices: scoped(&self.supplier_invoices, scope),
        }
    }

    /// Number of records stamped with `company_id`, across every kind.
    pub fn owned_by(&self, company_id: &str) -> usize {
        fn count<E: Entity>(records: &[E], company_id: &str) -> usize {
            records
                .iter()
                .filter(|r| r.company_id() == Some(company_id))
                .count()
        }

        count(&self.users, company_id)
            + count(&self.products, company_id)
            + count(&self.sales, company_id)
            + count(&self.clients, company_id)
            + count(&self.suppliers, company_id)
            + count(&self.expenses, company_id)
            + count(&self.client_orders, company_id)
            + count(&self.supplier_orders, company_id)
            + count(&self.supplier_invoices, company_id)
    }

    pub fn record_count(&self) -> usize {
        self.companies.len()
            + self.users.len()
            + self.products.len()
            + self.sales.len()
            + self.clients.len()
            + self.suppliers.len()
            + self.expenses.len()
            + self.client_orders.len()
            + self.supplier_orders.len()
            + self.supplier_invoices.len()
    }
}

/// An entity kind held by the cache.
pub trait CachedEntity: Entity {
    fn slot(collections: &Collections) -> &Vec<Self>;

    fn slot_mut(collections: &mut Collections) -> &mut Vec<Self>;
}

macro_rules! cached_entity {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl CachedEntity for $ty {
                fn slot(collections: &Collections) -> &Vec<Self> {
                    &collections.$field
                }

                fn slot_mut(collections: &mut Collections) -> &mut Vec<Self> {
                    &mut collections.$field
                }
            }
        )*
    };
}

cached_entity! {
    Company => companies,
    User => users,
    Product => products,
    Sale => sales,
    Client => clients,
    Supplier => suppliers,
    Expense => expenses,
    ClientOrder => client_orders,
    SupplierOrder => supplier_orders,
    SupplierInvoice => supplier_invoices,
}

/// Raw collections plus their views for the active scope.
#[derive(Debug, Clone)]
pub struct StateCache {
    raw: Collections,
    scope: TenantScope,
    views: Collections,
    revision: u64,
}

impl StateCache {
    pub fn new(raw: Collections, scope: TenantScope) -> Self {
        let views = raw.scoped(&scope);
        StateCache {
            raw,
            scope,
            views,
            revision: 0,
        }
    }

    /// Loads every collection through the gateway.
    pub async fn load<R: RemoteBackend>(
        gateway: &SyncGateway<R>,
        scope: TenantScope,
    ) -> SyncResult<Self> {
        let raw = Collections::fetch(gateway).await?;
        debug!(records = raw.record_count(), "State cache loaded");
        Ok(StateCache::new(raw, scope))
    }

    /// Replaces every raw collection, keeping the scope.
    pub fn replace_all(&mut self, raw: Collections) {
        self.raw = raw;
        self.views = self.raw.scoped(&self.scope);
        self.revision += 1;
    }

    pub fn scope(&self) -> &TenantScope {
        &self.scope
    }

    /// Switches the active scope and rebuilds every view.
    pub fn set_scope(&mut self, scope: TenantScope) {
        if self.scope == scope {
            return;
        }
        debug!(tenant = ?scope.tenant_id(), "Tenant scope changed");
        self.scope = scope;
        self.views = self.raw.scoped(&self.scope);
        self.revision += 1;
    }

    /// Bumped on every change to the raw data or the scope.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn collections(&self) -> &Collections {
        &self.raw
    }

    /// Every record of kind `E`, all tenants.
    pub fn raw<E: CachedEntity>(&self) -> &[E] {
        E::slot(&self.raw)
    }

    /// Records of kind `E` visible in the active scope.
    pub fn scoped_view<E: CachedEntity>(&self) -> &[E] {
        E::slot(&self.views)
    }

    /// Records of kind `E` visible in an arbitrary scope.
    pub fn scoped_view_for<E: CachedEntity>(&self, scope: &TenantScope) -> Vec<E> {
        scoped(E::slot(&self.raw), scope)
    }

    pub fn find<E: CachedEntity>(&self, id: &str) -> Option<&E> {
        E::slot(&self.raw).iter().find(|e| e.id() == id)
    }

    /// Looks `id` up in the active scope only.
    pub fn find_scoped<E: CachedEntity>(&self, id: &str) -> Option<&E> {
        E::slot(&self.views).iter().find(|e| e.id() == id)
    }

    /// Inserts or replaces the record with the same id.
    pub fn upsert<E: CachedEntity>(&mut self, entity: E) {
        let items = E::slot_mut(&mut self.raw);
        match items.iter_mut().find(|e| e.id() == entity.id()) {
            Some(existing) => *existing = entity,
            None => items.push(entity),
        }
        self.refresh::<E>();
    }

    pub fn remove<E: CachedEntity>(&mut self, id: &str) -> Option<E> {
        let items = E::slot_mut(&mut self.raw);
        let position = items.iter().position(|e| e.id() == id)?;
        let removed = items.remove(position);
        self.refresh::<E>();
        Some(removed)
    }

    fn refresh<E: CachedEntity>(&mut self) {
        *E::slot_mut(&mut self.views) = scoped(E::slot(&self.raw), &self.scope);
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use comptoir_core::seed::canonical_seed;

    fn seeded() -> StateCache {
        let seed = canonical_seed(Utc::now());
        let raw = Collections {
            companies: seed.companies,
            users: seed.users,
            products: seed.products,
            sales: seed.sales,
            clients: seed.clients,
            suppliers: seed.suppliers,
            expenses: seed.expenses,
            ..Collections::default()
        };
        StateCache::new(raw, TenantScope::tenant("1"))
    }

    #[test]
    fn test_views_follow_scope() {
        let mut cache = seeded();
        assert!(cache.scoped_view::<Product>().iter().all(|p| p.company_id == "1"));
        assert_eq!(cache.scoped_view::<Company>().len(), 2);
        assert!(cache.find_scoped::<Product>("201").is_none());

        let before = cache.revision();
        cache.set_scope(TenantScope::tenant("2"));
        assert!(cache.revision() > before);
        assert!(cache.scoped_view::<Product>().iter().all(|p| p.company_id == "2"));
        assert!(cache.find_scoped::<Product>("201").is_some());
        assert!(cache.find_scoped::<Product>("1").is_none());
    }

    #[test]
    fn test_unscoped_shows_only_super_admin() {
        let mut cache = seeded();
        cache.set_scope(TenantScope::Unscoped);

        let users = cache.scoped_view::<User>();
        assert_eq!(users.len(), 1);
        assert!(users[0].is_super_admin());
        assert!(cache.scoped_view::<Sale>().is_empty());
    }

    #[test]
    fn test_upsert_refreshes_view() {
        let mut cache = seeded();
        let mut product = cache.find::<Product>("1").cloned().unwrap();
        product.stock = 3;
        cache.upsert(product);

        assert_eq!(cache.find_scoped::<Product>("1").unwrap().stock, 3);
        assert_eq!(cache.raw::<Product>().len(), 6);

        let mut foreign = product_in("2");
        foreign.id = "new".to_string();
        cache.upsert(foreign);
        assert_eq!(cache.raw::<Product>().len(), 7);
        assert!(cache.find_scoped::<Product>("new").is_none());
    }

    #[test]
    fn test_remove() {
        let mut cache = seeded();
        assert!(cache.remove::<Sale>("1001").is_some());
        assert!(cache.remove::<Sale>("1001").is_none());
        assert!(cache.scoped_view::<Sale>().is_empty());
    }

    #[test]
    fn test_scoped_view_for_other_tenant() {
        let cache = seeded();
        let other = cache.scoped_view_for::<Client>(&TenantScope::tenant("2"));
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].id, "3");
    }

    #[test]
    fn test_owned_by_counts_tenant_records() {
        let mut cache = seeded();
        let owned = cache.collections().owned_by("2");
        assert!(owned > 0);

        cache.upsert(product_in("3"));
        assert_eq!(cache.collections().owned_by("3"), 1);
        assert_eq!(cache.collections().owned_by("4"), 0);
        assert_eq!(cache.collections().owned_by("2"), owned);
    }

    fn product_in(company: &str) -> Product {
        let mut product = canonical_seed(Utc::now()).products[0].clone();
        product.company_id = company.to_string();
        product
    }
}
