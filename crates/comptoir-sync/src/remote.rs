//! # Remote Backend Seam
//!
//! The gateway talks to the network through [`RemoteBackend`]. No wire
//! protocol is defined here: [`PlaceholderRemote`] accepts every write and
//! returns no records, and [`MemoryRemote`] keeps records in memory with a
//! switchable outage and latency.
//!
//! Implementations must be idempotent by record identifier: the queue drain
//! delivers at least once.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;
use url::Url;

use comptoir_core::{Collection, Entity};

use crate::error::{RemoteError, RemoteResult, SyncResult};

/// One record as exchanged with the remote backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    pub collection: Collection,
    pub id: String,
    pub payload: Value,
}

impl RemoteRecord {
    pub fn from_entity<E: Entity>(entity: &E) -> SyncResult<Self> {
        Ok(RemoteRecord {
            collection: E::COLLECTION,
            id: entity.id().to_string(),
            payload: serde_json::to_value(entity)?,
        })
    }
}

/// Network side of the sync gateway.
pub trait RemoteBackend: Send + Sync + 'static {
    /// Every record the backend holds for `collection`, as entity JSON.
    fn fetch_all(
        &self,
        collection: Collection,
    ) -> impl Future<Output = RemoteResult<Vec<Value>>> + Send;

    /// Inserts or replaces one record.
    fn put(&self, record: &RemoteRecord) -> impl Future<Output = RemoteResult<()>> + Send;

    /// Removes one record. Removing an absent record succeeds.
    fn delete(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = RemoteResult<()>> + Send;
}

// =============================================================================
// Placeholder
// =============================================================================

/// Stand-in backend: acknowledges every write, holds nothing.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderRemote {
    base_url: Option<Url>,
}

impl PlaceholderRemote {
    pub fn new(base_url: Option<Url>) -> Self {
        PlaceholderRemote { base_url }
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    fn endpoint(&self, collection: Collection) -> String {
        match &self.base_url {
            Some(base) => format!("{}/{}", base.as_str().trim_end_matches('/'), collection),
            None => format!("<unset>/{}", collection),
        }
    }
}

impl RemoteBackend for PlaceholderRemote {
    async fn fetch_all(&self, collection: Collection) -> RemoteResult<Vec<Value>> {
        debug!(endpoint = %self.endpoint(collection), "Remote fetch (placeholder)");
        Ok(Vec::new())
    }

    async fn put(&self, record: &RemoteRecord) -> RemoteResult<()> {
        debug!(
            endpoint = %self.endpoint(record.collection),
            id = %record.id,
            "Remote put (placeholder)"
        );
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> RemoteResult<()> {
        debug!(endpoint = %self.endpoint(collection), id = %id, "Remote delete (placeholder)");
        Ok(())
    }
}

// =============================================================================
// In-Memory Backend
// =============================================================================

/// A call received by [`MemoryRemote`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    FetchAll(Collection),
    Put(Collection, String),
    Delete(Collection, String),
}

#[derive(Debug, Default)]
struct MemoryState {
    records: BTreeMap<(Collection, String), Value>,
    calls: Vec<RemoteCall>,
}

/// In-memory backend with a switchable outage and artificial latency.
///
/// Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    state: Arc<Mutex<MemoryState>>,
    unreachable: Arc<AtomicBool>,
    latency_ms: Arc<AtomicU64>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// While unreachable, every call fails with [`RemoteError::Unavailable`].
    pub fn set_reachable(&self, reachable: bool) {
        self.unreachable.store(!reachable, Ordering::SeqCst);
    }

    /// Delay applied before every call completes.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Stores a record directly, as if another device had written it.
    pub fn insert(&self, record: RemoteRecord) {
        self.lock()
            .records
            .insert((record.collection, record.id), record.payload);
    }

    pub fn get(&self, collection: Collection, id: &str) -> Option<Value> {
        self.lock().records.get(&(collection, id.to_string())).cloned()
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.lock()
            .records
            .keys()
            .filter(|(c, _)| *c == collection)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// Every call received so far, including failed ones.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn enter(&self, call: RemoteCall) -> RemoteResult<()> {
        self.lock().calls.push(call);

        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("remote unreachable".to_string()));
        }
        Ok(())
    }
}

impl RemoteBackend for MemoryRemote {
    async fn fetch_all(&self, collection: Collection) -> RemoteResult<Vec<Value>> {
        self.enter(RemoteCall::FetchAll(collection)).await?;

        Ok(self
            .lock()
            .records
            .iter()
            .filter(|((c, _), _)| *c == collection)
            .map(|(_, payload)| payload.clone())
            .collect())
    }

    async fn put(&self, record: &RemoteRecord) -> RemoteResult<()> {
        self.enter(RemoteCall::Put(record.collection, record.id.clone()))
            .await?;
        self.insert(record.clone());
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> RemoteResult<()> {
        self.enter(RemoteCall::Delete(collection, id.to_string()))
            .await?;
        self.lock().records.remove(&(collection, id.to_string()));
        Ok(())
    }
}
