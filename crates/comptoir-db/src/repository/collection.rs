//! # Collection Repository
//!
//! Keyed get-all / get / put / delete over one entity collection.
//!
//! Each row keeps the entity's camelCase JSON in `payload`. The `company_id`
//! column mirrors the payload's owner for indexing and diagnostics; reads
//! always decode the payload, so the JSON is the record.

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use std::marker::PhantomData;
use tracing::debug;

use comptoir_core::{Collection, Entity};

use crate::error::{StorageError, StorageResult};

/// Repository for one entity collection.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.collection::<Client>();
///
/// let stored = repo.put(&client).await?;
/// let all = repo.get_all().await?;
/// repo.delete(&client.id).await?;
/// ```
#[derive(Debug)]
pub struct CollectionRepository<E> {
    pool: SqlitePool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for CollectionRepository<E> {
    fn clone(&self) -> Self {
        CollectionRepository {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> CollectionRepository<E> {
    /// Creates a new CollectionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CollectionRepository {
            pool,
            _entity: PhantomData,
        }
    }

    /// Returns every record in the collection.
    ///
    /// Rows come back in first-insert order. Callers must not rely on it.
    pub async fn get_all(&self) -> StorageResult<Vec<E>> {
        let sql = format!(
            "SELECT payload FROM {} ORDER BY rowid ASC",
            E::COLLECTION.table()
        );

        let payloads: Vec<String> = sqlx::query_scalar(&sql).fetch_all(&self.pool).await?;

        debug!(
            collection = %E::COLLECTION,
            count = payloads.len(),
            "Loaded collection"
        );

        payloads.iter().map(|p| decode::<E>(p)).collect()
    }

    /// Gets a single record by identifier.
    ///
    /// ## Returns
    /// * `Ok(Some(entity))` - Record found
    /// * `Ok(None)` - No record with this identifier
    pub async fn get(&self, id: &str) -> StorageResult<Option<E>> {
        let sql = format!(
            "SELECT payload FROM {} WHERE id = ?1",
            E::COLLECTION.table()
        );

        let payload: Option<String> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        payload.as_deref().map(decode::<E>).transpose()
    }

    /// Inserts the record, or replaces the stored one wholesale.
    ///
    /// Returns the value as it now reads back from the store.
    pub async fn put(&self, entity: &E) -> StorageResult<E> {
        let payload = upsert(&self.pool, entity).await?;

        debug!(collection = %E::COLLECTION, id = %entity.id(), "Stored record");

        decode::<E>(&payload)
    }

    /// Writes every record in one transaction. Either all land or none do.
    pub async fn put_many(&self, entities: &[E]) -> StorageResult<usize> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::TransactionFailed(e.to_string()))?;

        for entity in entities {
            upsert(&mut *tx, entity).await?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::TransactionFailed(e.to_string()))?;

        debug!(
            collection = %E::COLLECTION,
            count = entities.len(),
            "Stored batch"
        );

        Ok(entities.len())
    }

    /// Removes the record if present. Removing an absent record is not an
    /// error.
    ///
    /// ## Returns
    /// Whether a record was removed.
    pub async fn delete(&self, id: &str) -> StorageResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", E::COLLECTION.table());

        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        let removed = result.rows_affected() > 0;

        debug!(collection = %E::COLLECTION, id = %id, removed, "Deleted record");

        Ok(removed)
    }

    /// Counts records in the collection.
    pub async fn count(&self) -> StorageResult<i64> {
        count_rows(&self.pool, E::COLLECTION).await
    }
}

/// Writes one record through any executor (pool, connection, transaction).
///
/// Returns the JSON payload that was stored.
pub(crate) async fn upsert<'c, E, X>(executor: X, entity: &E) -> StorageResult<String>
where
    E: Entity,
    X: SqliteExecutor<'c>,
{
    let payload = serde_json::to_string(entity)
        .map_err(|e| StorageError::serialization(E::COLLECTION, e))?;

    let sql = format!(
        r#"
        INSERT INTO {} (id, company_id, payload, updated_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(id) DO UPDATE SET
            company_id = excluded.company_id,
            payload = excluded.payload,
            updated_at = excluded.updated_at
        "#,
        E::COLLECTION.table()
    );

    sqlx::query(&sql)
        .bind(entity.id())
        .bind(entity.company_id())
        .bind(&payload)
        .bind(Utc::now().timestamp_millis())
        .execute(executor)
        .await?;

    Ok(payload)
}

pub(crate) async fn count_rows<'c, X>(executor: X, collection: Collection) -> StorageResult<i64>
where
    X: SqliteExecutor<'c>,
{
    let sql = format!("SELECT COUNT(*) FROM {}", collection.table());
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(executor).await?;
    Ok(count)
}

fn decode<E: Entity>(payload: &str) -> StorageResult<E> {
    serde_json::from_str(payload).map_err(|e| StorageError::serialization(E::COLLECTION, e))
}
