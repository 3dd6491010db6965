//! # Application Context
//!
//! Everything a handler needs, owned in one place with an explicit
//! lifecycle.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       AppContext::init                                  │
//! │                                                                         │
//! │  1. Open Database ────────────────────────────────────────────────────► │
//! │     • SQLite with WAL mode, pending migrations applied                  │
//! │                                                                         │
//! │  2. Seed Bootstrap ───────────────────────────────────────────────────► │
//! │     • products empty? write the canonical set in one transaction        │
//! │     • a failure here stops startup: no half-seeded store                │
//! │                                                                         │
//! │  3. Build Sync Gateway ───────────────────────────────────────────────► │
//! │     • connectivity flag from config, remote backend from caller         │
//! │                                                                         │
//! │  4. Load State Cache ─────────────────────────────────────────────────► │
//! │     • one fetch per collection, all ten concurrently                    │
//! │     • nobody logged in yet: scope is Unscoped                           │
//! │                                                                         │
//! │  teardown() closes the pool; the store is durable from then on.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Helpers
//! Handlers never call the gateway directly. [`AppContext::persist`] and
//! [`AppContext::discard`] write through the gateway, mirror the result
//! into the cache and turn the write status into a notice.

use chrono::Utc;
use tracing::{debug, error, info};

use comptoir_core::seed::canonical_seed;
use comptoir_core::{Company, Entity};
use comptoir_db::{Database, SeedOutcome};
use comptoir_sync::{Connectivity, RemoteBackend, SyncError, SyncGateway, WriteStatus};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppConfig, CachedEntity, Cart, Collections, Notice, Notices, Session, StateCache};

/// Application state passed to every handler.
pub struct AppContext<R: RemoteBackend> {
    gateway: SyncGateway<R>,
    cache: StateCache,
    session: Session,
    cart: Cart,
    notices: Notices,
    config: AppConfig,
}

impl<R: RemoteBackend> AppContext<R> {
    /// Opens the store, seeds it on first run and loads the cache.
    pub async fn init(config: AppConfig, remote: R) -> ApiResult<Self> {
        info!(path = ?config.database_path, "Opening local store");
        let db = Database::new(config.db_config())
            .await
            .inspect_err(|e| error!(error = %e, "Local store could not be opened"))?;

        let seed = canonical_seed(Utc::now());
        match db
            .seeder()
            .seed_if_empty(&seed)
            .await
            .inspect_err(|e| error!(error = %e, "Seed bootstrap failed"))?
        {
            SeedOutcome::Seeded { records } => info!(records, "First run: store seeded"),
            SeedOutcome::AlreadySeeded { products } => debug!(products, "Store already seeded"),
        }

        let connectivity = Connectivity::new(config.start_online);
        let gateway = SyncGateway::new(db, remote, connectivity, &config.sync);

        let session = Session::new();
        let cache = StateCache::load(&gateway, session.scope()).await?;

        info!(
            records = cache.collections().record_count(),
            online = gateway.is_online(),
            "Application context ready"
        );

        Ok(AppContext {
            gateway,
            cache,
            session,
            cart: Cart::new(),
            notices: Notices::new(),
            config,
        })
    }

    /// Closes the store. The context cannot be used afterwards.
    pub async fn teardown(self) {
        self.gateway.database().close().await;
        info!("Application context closed");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn gateway(&self) -> &SyncGateway<R> {
        &self.gateway
    }

    pub fn cache(&self) -> &StateCache {
        &self.cache
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Takes every pending notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub(crate) fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub(crate) fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    /// The company the session is working in.
    pub fn active_company(&self) -> ApiResult<&Company> {
        let company_id = self.session.require_tenant()?;
        self.cache
            .find::<Company>(company_id)
            .ok_or_else(|| ApiError::not_found(Company::KIND, company_id))
    }

    /// A copy of the record `id`, if the active tenant may see it.
    pub(crate) fn scoped_record<E: CachedEntity>(&self, id: &str) -> ApiResult<E> {
        self.cache
            .find_scoped::<E>(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(E::KIND, id))
    }

    /// Aligns the cache scope with the session. A tenant change empties the
    /// cart: its lines belong to the previous company.
    pub(crate) fn apply_scope(&mut self) {
        let scope = self.session.scope();
        if *self.cache.scope() != scope {
            self.cart.clear();
            self.cache.set_scope(scope);
        }
    }

    /// Re-reads every collection through the gateway.
    pub async fn reload(&mut self) -> ApiResult<()> {
        let raw = Collections::fetch(&self.gateway).await?;
        self.cache.replace_all(raw);
        Ok(())
    }

    // =========================================================================
    // Write Helpers
    // =========================================================================

    /// Saves through the gateway and mirrors the stored record in the cache.
    pub(crate) async fn persist<E: CachedEntity>(&mut self, entity: &E) -> ApiResult<E> {
        let outcome = match self.gateway.save(entity).await {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.write_failed(E::KIND, entity.id(), err)),
        };

        self.report(E::KIND, &outcome.status);
        self.cache.upsert(outcome.entity.clone());
        Ok(outcome.entity)
    }

    /// Removes through the gateway and from the cache.
    pub(crate) async fn discard<E: CachedEntity>(&mut self, id: &str) -> ApiResult<bool> {
        let outcome = match self.gateway.remove::<E>(id).await {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.write_failed(E::KIND, id, err)),
        };

        self.report(E::KIND, &outcome.status);
        self.cache.remove::<E>(id);
        Ok(outcome.removed)
    }

    fn write_failed(&mut self, kind: &str, id: &str, err: SyncError) -> ApiError {
        error!(kind, id, error = %err, "Write failed");
        let api: ApiError = err.into();
        self.notices
            .error(format!("{} could not be saved: {}", kind, api.message));
        api
    }

    fn report(&mut self, kind: &str, status: &WriteStatus) {
        match status {
            WriteStatus::Synced => {}
            WriteStatus::SavedLocally => self.notices.info(format!(
                "{} saved locally, will sync when back online",
                kind
            )),
            WriteStatus::RemoteFailed { reason } => self.notices.warning(format!(
                "{} saved locally; sync failed ({}) and will be retried",
                kind, reason
            )),
        }
    }
}
