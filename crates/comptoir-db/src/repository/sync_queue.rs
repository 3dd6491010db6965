//! # Sync Queue Repository
//!
//! Durable list of writes the remote backend has not acknowledged yet.
//!
//! ## Queue Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Pending Remote Writes                                │
//! │                                                                         │
//! │  SyncGateway::save(entity)                                             │
//! │       │                                                                 │
//! │       ├── local put (always)                                           │
//! │       │                                                                 │
//! │       ├── offline / remote failed                                      │
//! │       │       └──► enqueue(put, collection, id, payload)               │
//! │       │                                                                 │
//! │       └── remote ok                                                    │
//! │               └──► remove_for_entity(collection, id)                   │
//! │                                                                         │
//! │  SyncGateway::drain_queue()   (on reconnect)                           │
//! │       │                                                                 │
//! │       ├── get_pending(limit)     ORDER BY created_at, rowid            │
//! │       ├── replay entry                                                 │
//! │       │     ├── ack  → remove(id)                                      │
//! │       │     └── fail → mark_failed(id, error), stop                    │
//! │       └── ...                                                          │
//! │                                                                         │
//! │  Replay is at-least-once. Puts replace by id, deletes of absent ids    │
//! │  are no-ops, so a duplicate replay converges to the same state.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use comptoir_core::{Collection, QueueOperation, SyncQueueEntry};

use crate::error::{StorageError, StorageResult};

/// Repository for sync queue operations.
#[derive(Debug, Clone)]
pub struct SyncQueueRepository {
    pool: SqlitePool,
}

impl SyncQueueRepository {
    /// Creates a new SyncQueueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SyncQueueRepository { pool }
    }

    /// Appends a pending write.
    ///
    /// ## Arguments
    /// * `operation` - `Put` or `Delete`
    /// * `collection` - Entity collection the write targets
    /// * `entity_id` - Identifier of the written record
    /// * `payload` - Full entity JSON for puts, `None` for deletes
    ///
    /// ## Example
    /// ```rust,ignore
    /// let payload = serde_json::to_string(&sale)?;
    /// queue.enqueue(QueueOperation::Put, Collection::Sales, &sale.id, Some(&payload)).await?;
    /// ```
    pub async fn enqueue(
        &self,
        operation: QueueOperation,
        collection: Collection,
        entity_id: &str,
        payload: Option<&str>,
    ) -> StorageResult<SyncQueueEntry> {
        let entry = SyncQueueEntry {
            id: Uuid::new_v4().to_string(),
            operation,
            collection,
            entity_id: entity_id.to_string(),
            payload: payload.map(str::to_string),
            attempts: 0,
            last_error: None,
            timestamp: Utc::now().timestamp_millis(),
            attempted_at: None,
        };

        debug!(
            operation = %operation.as_str(),
            collection = %collection,
            entity_id = %entity_id,
            "Queuing for sync"
        );

        sqlx::query(
            r#"
            INSERT INTO sync_queue (
                id, operation, collection, entity_id, payload,
                attempts, last_error, created_at, attempted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.operation.as_str())
        .bind(entry.collection.name())
        .bind(&entry.entity_id)
        .bind(&entry.payload)
        .bind(entry.attempts)
        .bind(&entry.last_error)
        .bind(entry.timestamp)
        .bind(entry.attempted_at)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Gets pending entries, oldest first.
    ///
    /// Entries enqueued within the same millisecond keep insertion order.
    pub async fn get_pending(&self, limit: u32) -> StorageResult<Vec<SyncQueueEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT
                id, operation, collection, entity_id, payload,
                attempts, last_error, created_at, attempted_at
            FROM sync_queue
            ORDER BY created_at ASC, rowid ASC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(entry_from_row).collect()
    }

    /// Removes an acknowledged entry.
    pub async fn remove(&self, id: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM sync_queue WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Drops every queued write for one record.
    ///
    /// ## Returns
    /// Number of removed entries.
    pub async fn remove_for_entity(
        &self,
        collection: Collection,
        entity_id: &str,
    ) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM sync_queue WHERE collection = ?1 AND entity_id = ?2")
            .bind(collection.name())
            .bind(entity_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            debug!(
                collection = %collection,
                entity_id = %entity_id,
                dropped = result.rows_affected(),
                "Dropped superseded queue entries"
            );
        }

        Ok(result.rows_affected())
    }

    /// Records a failed replay attempt.
    pub async fn mark_failed(&self, id: &str, error: &str) -> StorageResult<()> {
        sqlx::query(
            r#"
            UPDATE sync_queue SET
                attempts = attempts + 1,
                last_error = ?2,
                attempted_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(error)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts pending entries.
    pub async fn count_pending(&self) -> StorageResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sync_queue")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Identifiers of records in `collection` that still have queued writes.
    pub async fn pending_entity_ids(&self, collection: Collection) -> StorageResult<HashSet<String>> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT entity_id FROM sync_queue WHERE collection = ?1")
                .bind(collection.name())
                .fetch_all(&self.pool)
                .await?;

        Ok(ids.into_iter().collect())
    }
}

fn entry_from_row(row: &SqliteRow) -> StorageResult<SyncQueueEntry> {
    let operation: String = row.try_get("operation")?;
    let collection: String = row.try_get("collection")?;

    let invalid = |message: String| StorageError::Serialization {
        collection: Collection::SyncQueue.name().to_string(),
        message,
    };

    Ok(SyncQueueEntry {
        id: row.try_get("id")?,
        operation: operation.parse().map_err(|e| invalid(format!("{}", e)))?,
        collection: collection.parse().map_err(|e| invalid(format!("{}", e)))?,
        entity_id: row.try_get("entity_id")?,
        payload: row.try_get("payload")?,
        attempts: row.try_get("attempts")?,
        last_error: row.try_get("last_error")?,
        timestamp: row.try_get("created_at")?,
        attempted_at: row.try_get("attempted_at")?,
    })
}
