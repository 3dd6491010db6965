//! # Sync Gateway
//!
//! Uniform read/write entry point per entity kind. Every write lands in the
//! durable local store first; the remote path is attempted afterwards and
//! can never undo it.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         save(entity)                                    │
//! │                                                                         │
//! │  local put ── StorageError ──────────────────────────────► Err          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  online? (flag sampled once)                                           │
//! │       │                                                                 │
//! │       ├── no  ─► enqueue ───────────────────────────► SavedLocally      │
//! │       │                                                                 │
//! │       └── yes ─► remote put (bounded by remote_timeout)                │
//! │                     │                                                   │
//! │                     ├── ok   ─► drop queued writes ───► Synced          │
//! │                     │          for this record                         │
//! │                     │                                                   │
//! │                     └── fail ─► enqueue ────────────► RemoteFailed      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read Path
//! `fetch_all` asks the remote first when online and mirrors what it gets
//! into the local store, skipping records that still have queued local
//! writes. Whatever happens remotely, the result is the local collection.

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use comptoir_core::{
    Client, ClientOrder, Company, Entity, Expense, Product, QueueOperation, Sale, Supplier,
    SupplierInvoice, SupplierOrder, SyncQueueEntry, User,
};
use comptoir_db::Database;

use crate::config::{SyncConfig, SyncMode};
use crate::connectivity::Connectivity;
use crate::error::{RemoteError, RemoteResult, SyncResult};
use crate::remote::{RemoteBackend, RemoteRecord};

// =============================================================================
// Outcomes
// =============================================================================

/// How far a write got.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum WriteStatus {
    /// Stored locally and acknowledged by the remote backend.
    Synced,
    /// Stored locally while offline; queued for replay.
    SavedLocally,
    /// Stored locally; the remote write failed and was queued.
    RemoteFailed { reason: String },
}

impl WriteStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, WriteStatus::Synced)
    }
}

/// Result of [`SyncGateway::save`].
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome<E> {
    /// The record as stored locally.
    pub entity: E,
    pub status: WriteStatus,
    /// Whether a sync queue entry was written.
    pub queued: bool,
}

/// Result of [`SyncGateway::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// Whether a local record existed.
    pub removed: bool,
    pub status: WriteStatus,
    pub queued: bool,
}

/// Result of one queue drain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrainReport {
    /// Entries acknowledged and removed.
    pub replayed: usize,
    /// Why the drain stopped early, if it did.
    pub failed: Option<String>,
    /// Entries still queued afterwards.
    pub remaining: i64,
}

/// Snapshot of the gateway state, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub online: bool,
    pub mode: SyncMode,
    pub pending: i64,
}

// =============================================================================
// Gateway
// =============================================================================

/// Read/write facade over the local store and the remote backend.
pub struct SyncGateway<R> {
    db: Database,
    remote: Arc<R>,
    connectivity: Connectivity,
    mode: SyncMode,
    remote_timeout: Duration,
    drain_batch_size: u32,
    drain_on_reconnect: bool,
}

impl<R> Clone for SyncGateway<R> {
    fn clone(&self) -> Self {
        SyncGateway {
            db: self.db.clone(),
            remote: Arc::clone(&self.remote),
            connectivity: self.connectivity.clone(),
            mode: self.mode,
            remote_timeout: self.remote_timeout,
            drain_batch_size: self.drain_batch_size,
            drain_on_reconnect: self.drain_on_reconnect,
        }
    }
}

impl<R: RemoteBackend> SyncGateway<R> {
    pub fn new(db: Database, remote: R, connectivity: Connectivity, config: &SyncConfig) -> Self {
        SyncGateway {
            db,
            remote: Arc::new(remote),
            connectivity,
            mode: config.mode(),
            remote_timeout: config.remote_timeout(),
            drain_batch_size: config.sync.drain_batch_size,
            drain_on_reconnect: config.sync.drain_on_reconnect,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Whether this call may use the remote path.
    pub fn is_online(&self) -> bool {
        self.mode.is_sync_enabled() && self.connectivity.is_online()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns every record of kind `E`.
    ///
    /// Offline is not an error: the local collection is returned as-is.
    pub async fn fetch_all<E: Entity>(&self) -> SyncResult<Vec<E>> {
        if self.is_online() {
            match self.fetch_remote::<E>().await {
                Ok(records) => self.mirror(records).await?,
                Err(err) => warn!(
                    collection = %E::COLLECTION,
                    error = %err,
                    "Remote fetch failed, serving local copy"
                ),
            }
        }

        let records = self
            .db
            .collection::<E>()
            .get_all()
            .await
            .inspect_err(|e| error!(collection = %E::COLLECTION, error = %e, "Local read failed"))?;

        Ok(records)
    }

    async fn fetch_remote<E: Entity>(&self) -> RemoteResult<Vec<E>> {
        let values = self.call_remote(self.remote.fetch_all(E::COLLECTION)).await?;

        values
            .into_iter()
            .map(|value| {
                serde_json::from_value::<E>(value)
                    .map_err(|e| RemoteError::Malformed(format!("{}: {}", E::KIND, e)))
            })
            .collect()
    }

    /// Writes remote records locally, except those with queued local writes.
    async fn mirror<E: Entity>(&self, records: Vec<E>) -> SyncResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let pending = self.db.sync_queue().pending_entity_ids(E::COLLECTION).await?;
        let fresh: Vec<E> = records
            .into_iter()
            .filter(|record| !pending.contains(record.id()))
            .collect();

        let written = self.db.collection::<E>().put_many(&fresh).await?;
        debug!(collection = %E::COLLECTION, written, "Mirrored remote records");
        Ok(())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Stores `entity` locally, then tries the remote backend.
    ///
    /// Connectivity is read once, when the call starts.
    ///
    /// Only local failures are errors. A remote failure is reported in the
    /// returned status and the write is queued for replay.
    pub async fn save<E: Entity>(&self, entity: &E) -> SyncResult<SaveOutcome<E>> {
        let online = self.is_online();
        let stored = self
            .db
            .collection::<E>()
            .put(entity)
            .await
            .inspect_err(|e| {
                error!(collection = %E::COLLECTION, id = %entity.id(), error = %e, "Local write failed")
            })?;

        let record = RemoteRecord::from_entity(&stored)?;

        let (status, queued) = if online {
            match self.call_remote(self.remote.put(&record)).await {
                Ok(()) => {
                    self.db
                        .sync_queue()
                        .remove_for_entity(E::COLLECTION, stored.id())
                        .await?;
                    (WriteStatus::Synced, false)
                }
                Err(err) => {
                    warn!(
                        collection = %E::COLLECTION,
                        id = %stored.id(),
                        error = %err,
                        "Remote write failed, saved locally"
                    );
                    self.enqueue(QueueOperation::Put, &record).await?;
                    (WriteStatus::RemoteFailed { reason: err.to_string() }, true)
                }
            }
        } else {
            self.enqueue(QueueOperation::Put, &record).await?;
            (WriteStatus::SavedLocally, true)
        };

        debug!(collection = %E::COLLECTION, id = %stored.id(), ?status, "Saved");

        Ok(SaveOutcome {
            entity: stored,
            status,
            queued,
        })
    }

    /// Removes the record locally, then tries the remote backend.
    ///
    /// Removing an absent record is not an error.
    pub async fn remove<E: Entity>(&self, id: &str) -> SyncResult<RemoveOutcome> {
        let online = self.is_online();
        let removed = self
            .db
            .collection::<E>()
            .delete(id)
            .await
            .inspect_err(|e| {
                error!(collection = %E::COLLECTION, id = %id, error = %e, "Local delete failed")
            })?;

        let tombstone = RemoteRecord {
            collection: E::COLLECTION,
            id: id.to_string(),
            payload: serde_json::Value::Null,
        };

        let (status, queued) = if online {
            match self
                .call_remote(self.remote.delete(E::COLLECTION, id))
                .await
            {
                Ok(()) => {
                    self.db
                        .sync_queue()
                        .remove_for_entity(E::COLLECTION, id)
                        .await?;
                    (WriteStatus::Synced, false)
                }
                Err(err) => {
                    warn!(
                        collection = %E::COLLECTION,
                        id = %id,
                        error = %err,
                        "Remote delete failed, removed locally"
                    );
                    self.enqueue(QueueOperation::Delete, &tombstone).await?;
                    (WriteStatus::RemoteFailed { reason: err.to_string() }, true)
                }
            }
        } else {
            self.enqueue(QueueOperation::Delete, &tombstone).await?;
            (WriteStatus::SavedLocally, true)
        };

        Ok(RemoveOutcome {
            removed,
            status,
            queued,
        })
    }

    async fn enqueue(
        &self,
        operation: QueueOperation,
        record: &RemoteRecord,
    ) -> SyncResult<SyncQueueEntry> {
        let payload = match operation {
            QueueOperation::Put => Some(serde_json::to_string(&record.payload)?),
            QueueOperation::Delete => None,
        };

        let entry = self
            .db
            .sync_queue()
            .enqueue(operation, record.collection, &record.id, payload.as_deref())
            .await?;

        Ok(entry)
    }

    // =========================================================================
    // Queue Drain
    // =========================================================================

    /// Replays queued writes oldest first.
    ///
    /// Each acknowledged entry is removed. The first failure is recorded on
    /// its entry and ends the drain, so later writes never overtake it.
    /// Does nothing while offline.
    pub async fn drain_queue(&self) -> SyncResult<DrainReport> {
        let queue = self.db.sync_queue();
        let mut report = DrainReport::default();

        'drain: while self.is_online() {
            let batch = queue.get_pending(self.drain_batch_size).await?;
            if batch.is_empty() {
                break;
            }

            for entry in batch {
                if !self.is_online() {
                    break 'drain;
                }

                match self.replay(&entry).await {
                    Ok(()) => {
                        queue.remove(&entry.id).await?;
                        report.replayed += 1;
                    }
                    Err(err) => {
                        warn!(
                            entry_id = %entry.id,
                            collection = %entry.collection,
                            entity_id = %entry.entity_id,
                            attempts = entry.attempts + 1,
                            error = %err,
                            "Queue replay failed, stopping drain"
                        );
                        queue.mark_failed(&entry.id, &err.to_string()).await?;
                        report.failed = Some(err.to_string());
                        break 'drain;
                    }
                }
            }
        }

        report.remaining = queue.count_pending().await?;

        if report.replayed > 0 || report.failed.is_some() {
            info!(
                replayed = report.replayed,
                remaining = report.remaining,
                "Sync queue drained"
            );
        }

        Ok(report)
    }

    async fn replay(&self, entry: &SyncQueueEntry) -> RemoteResult<()> {
        match entry.operation {
            QueueOperation::Put => {
                let raw = entry.payload.as_deref().ok_or_else(|| {
                    RemoteError::Malformed(format!("queued put {} has no payload", entry.id))
                })?;
                let payload = serde_json::from_str(raw)
                    .map_err(|e| RemoteError::Malformed(e.to_string()))?;

                let record = RemoteRecord {
                    collection: entry.collection,
                    id: entry.entity_id.clone(),
                    payload,
                };
                self.call_remote(self.remote.put(&record)).await
            }
            QueueOperation::Delete => {
                self.call_remote(self.remote.delete(entry.collection, &entry.entity_id))
                    .await
            }
        }
    }

    /// Flips the connectivity flag. Coming back online drains the queue
    /// when `drain_on_reconnect` is set.
    pub async fn set_online(&self, online: bool) -> SyncResult<Option<DrainReport>> {
        let was_online = self.connectivity.set_online(online);

        if online && !was_online && self.drain_on_reconnect {
            return self.drain_queue().await.map(Some);
        }

        Ok(None)
    }

    pub async fn pending_count(&self) -> SyncResult<i64> {
        Ok(self.db.sync_queue().count_pending().await?)
    }

    pub async fn status(&self) -> SyncResult<SyncStatus> {
        Ok(SyncStatus {
            online: self.is_online(),
            mode: self.mode,
            pending: self.pending_count().await?,
        })
    }

    async fn call_remote<T>(
        &self,
        call: impl Future<Output = RemoteResult<T>>,
    ) -> RemoteResult<T> {
        match tokio::time::timeout(self.remote_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Timeout {
                ms: self.remote_timeout.as_millis() as u64,
            }),
        }
    }
}

// =============================================================================
// Per-Kind Surface
// =============================================================================

macro_rules! entity_surface {
    ($($ty:ty => $get:ident, $save:ident, $delete:ident;)*) => {
        impl<R: RemoteBackend> SyncGateway<R> {
            $(
                pub async fn $get(&self) -> SyncResult<Vec<$ty>> {
                    self.fetch_all::<$ty>().await
                }

                pub async fn $save(&self, entity: &$ty) -> SyncResult<SaveOutcome<$ty>> {
                    self.save(entity).await
                }

                pub async fn $delete(&self, id: &str) -> SyncResult<RemoveOutcome> {
                    self.remove::<$ty>(id).await
                }
            )*
        }
    };
}

entity_surface! {
    Product => get_products, save_product, delete_product;
    Sale => get_sales, save_sale, delete_sale;
    Client => get_clients, save_client, delete_client;
    Supplier => get_suppliers, save_supplier, delete_supplier;
    Expense => get_expenses, save_expense, delete_expense;
    Company => get_companies, save_company, delete_company;
    User => get_users, save_user, delete_user;
    ClientOrder => get_client_orders, save_client_order, delete_client_order;
    SupplierOrder => get_supplier_orders, save_supplier_order, delete_supplier_order;
    SupplierInvoice => get_supplier_invoices, save_supplier_invoice, delete_supplier_invoice;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{MemoryRemote, RemoteCall};
    use chrono::Utc;
    use comptoir_core::seed::canonical_seed;
    use comptoir_core::Collection;
    use comptoir_db::DbConfig;

    async fn setup(online: bool) -> (SyncGateway<MemoryRemote>, MemoryRemote) {
        setup_with(online, SyncConfig::default()).await
    }

    async fn setup_with(
        online: bool,
        config: SyncConfig,
    ) -> (SyncGateway<MemoryRemote>, MemoryRemote) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let remote = MemoryRemote::new();
        let gateway = SyncGateway::new(db, remote.clone(), Connectivity::new(online), &config);
        (gateway, remote)
    }

    fn client() -> Client {
        canonical_seed(Utc::now()).clients[0].clone()
    }

    #[tokio::test]
    async fn test_online_save_is_synced() {
        let (gateway, remote) = setup(true).await;

        let outcome = gateway.save_client(&client()).await.unwrap();

        assert_eq!(outcome.status, WriteStatus::Synced);
        assert!(!outcome.queued);
        assert_eq!(outcome.entity, client());
        assert!(remote.get(Collection::Clients, "1").is_some());
        assert_eq!(gateway.pending_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_offline_save_lands_locally_and_queues() {
        let (gateway, remote) = setup(false).await;

        let outcome = gateway.save_client(&client()).await.unwrap();

        assert_eq!(outcome.status, WriteStatus::SavedLocally);
        assert!(outcome.queued);
        assert_eq!(gateway.get_clients().await.unwrap(), vec![client()]);
        assert!(remote.calls().is_empty());
        assert_eq!(gateway.pending_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_local_write() {
        let (gateway, remote) = setup(true).await;
        remote.set_reachable(false);

        let outcome = gateway.save_client(&client()).await.unwrap();

        assert!(matches!(outcome.status, WriteStatus::RemoteFailed { .. }));
        assert!(outcome.queued);
        assert_eq!(gateway.get_clients().await.unwrap(), vec![client()]);
    }

    #[tokio::test]
    async fn test_slow_remote_is_bounded() {
        let mut config = SyncConfig::default();
        config.sync.remote_timeout_ms = 50;
        let (gateway, remote) = setup_with(true, config).await;
        remote.set_latency(Duration::from_secs(5));

        let started = std::time::Instant::now();
        let outcome = gateway.save_client(&client()).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        match outcome.status {
            WriteStatus::RemoteFailed { reason } => assert!(reason.contains("timed out")),
            other => panic!("expected RemoteFailed, got {:?}", other),
        }
        assert_eq!(gateway.database().collection::<Client>().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_connectivity_is_read_at_call_start() {
        let (gateway, remote) = setup(true).await;

        let connectivity = gateway.connectivity().clone();
        tokio::spawn(async move {
            connectivity.set_online(false);
        });
        let outcome = gateway.save_client(&client()).await.unwrap();

        assert_eq!(outcome.status, WriteStatus::Synced);
        assert!(remote.get(Collection::Clients, "1").is_some());

        tokio::task::yield_now().await;
        assert!(!gateway.is_online());

        // Started offline: the delete stays local even if connectivity returns mid-call.
        let connectivity = gateway.connectivity().clone();
        tokio::spawn(async move {
            connectivity.set_online(true);
        });
        let outcome = gateway.delete_client("1").await.unwrap();

        assert_eq!(outcome.status, WriteStatus::SavedLocally);
        assert!(outcome.queued);
        assert!(remote.get(Collection::Clients, "1").is_some());
    }

    #[tokio::test]
    async fn test_offline_mode_ignores_connectivity() {
        let mut config = SyncConfig::default();
        config.sync.mode = SyncMode::Offline;
        let (gateway, remote) = setup_with(true, config).await;

        assert!(!gateway.is_online());
        let outcome = gateway.save_client(&client()).await.unwrap();
        assert_eq!(outcome.status, WriteStatus::SavedLocally);
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_direct_success_drops_older_queued_writes() {
        let (gateway, remote) = setup(false).await;
        let mut c = client();
        gateway.save_client(&c).await.unwrap();
        assert_eq!(gateway.pending_count().await.unwrap(), 1);

        gateway.connectivity().set_online(true);
        c.notes = Some("updated".to_string());
        let outcome = gateway.save_client(&c).await.unwrap();

        assert!(outcome.status.is_synced());
        assert_eq!(gateway.pending_count().await.unwrap(), 0);
        assert_eq!(
            remote.get(Collection::Clients, "1").unwrap()["notes"],
            serde_json::json!("updated")
        );
    }

    #[tokio::test]
    async fn test_drain_replays_in_order() {
        let (gateway, remote) = setup(false).await;
        let c = client();
        gateway.save_client(&c).await.unwrap();
        gateway.delete_client(&c.id).await.unwrap();

        let report = gateway.set_online(true).await.unwrap().unwrap();

        assert_eq!(report.replayed, 2);
        assert_eq!(report.remaining, 0);
        assert!(report.failed.is_none());
        assert_eq!(
            remote.calls(),
            vec![
                RemoteCall::Put(Collection::Clients, "1".to_string()),
                RemoteCall::Delete(Collection::Clients, "1".to_string()),
            ]
        );
        assert!(remote.get(Collection::Clients, "1").is_none());
    }

    #[tokio::test]
    async fn test_drain_stops_at_first_failure() {
        let (gateway, remote) = setup(false).await;
        let seed = canonical_seed(Utc::now());
        for c in &seed.clients {
            gateway.save_client(c).await.unwrap();
        }
        gateway.save_product(&seed.products[0]).await.unwrap();

        remote.set_reachable(false);
        gateway.connectivity().set_online(true);
        let report = gateway.drain_queue().await.unwrap();

        assert_eq!(report.replayed, 0);
        assert!(report.failed.is_some());
        assert_eq!(report.remaining, 3);
        assert_eq!(remote.calls().len(), 1);

        let pending = gateway.database().sync_queue().get_pending(10).await.unwrap();
        assert_eq!(pending[0].attempts, 1);
        assert_eq!(pending[1].attempts, 0);

        remote.set_reachable(true);
        let report = gateway.drain_queue().await.unwrap();
        assert_eq!(report.replayed, 3);
        assert_eq!(report.remaining, 0);
        assert_eq!(remote.len(Collection::Clients), 2);
        assert_eq!(remote.len(Collection::Products), 1);
    }

    #[tokio::test]
    async fn test_drain_does_nothing_offline() {
        let (gateway, remote) = setup(false).await;
        gateway.save_client(&client()).await.unwrap();

        let report = gateway.drain_queue().await.unwrap();
        assert_eq!(report.replayed, 0);
        assert_eq!(report.remaining, 1);
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_mirrors_remote_except_pending() {
        let (gateway, remote) = setup(false).await;
        let seed = canonical_seed(Utc::now());

        let mut local = seed.clients[0].clone();
        local.notes = Some("local edit".to_string());
        gateway.save_client(&local).await.unwrap();

        let mut stale = seed.clients[0].clone();
        stale.notes = Some("remote copy".to_string());
        remote.insert(RemoteRecord::from_entity(&stale).unwrap());
        remote.insert(RemoteRecord::from_entity(&seed.clients[1]).unwrap());

        gateway.connectivity().set_online(true);
        let clients = gateway.get_clients().await.unwrap();

        assert_eq!(clients.len(), 2);
        let first = clients.iter().find(|c| c.id == "1").unwrap();
        assert_eq!(first.notes.as_deref(), Some("local edit"));
        assert!(clients.iter().any(|c| c.id == "3"));
    }

    #[tokio::test]
    async fn test_unreachable_fetch_falls_back_to_local() {
        let (gateway, remote) = setup(true).await;
        gateway.save_client(&client()).await.unwrap();
        remote.set_reachable(false);

        assert_eq!(gateway.get_clients().await.unwrap(), vec![client()]);
    }

    #[tokio::test]
    async fn test_storage_failure_is_an_error() {
        let (gateway, _remote) = setup(true).await;
        gateway.database().close().await;

        let err = gateway.save_client(&client()).await.unwrap_err();
        assert!(matches!(err, crate::error::SyncError::Storage(_)));
    }

    #[tokio::test]
    async fn test_status_reports_pending() {
        let (gateway, _remote) = setup(false).await;
        gateway.save_client(&client()).await.unwrap();

        let status = gateway.status().await.unwrap();
        assert!(!status.online);
        assert_eq!(status.mode, SyncMode::Auto);
        assert_eq!(status.pending, 1);
    }
}
