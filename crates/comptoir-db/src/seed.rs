//! # Seed Bootstrapper
//!
//! Writes the canonical seed set on first run, exactly once.
//!
//! ```text
//! BEGIN
//!   SELECT COUNT(*) FROM products
//!   ├── > 0 → ROLLBACK, AlreadySeeded
//!   └── = 0 → write companies, users, products, sales,
//!             clients, suppliers, expenses
//! COMMIT → Seeded
//! ```
//!
//! The emptiness check and the writes share one transaction: a failure
//! part-way leaves the store as empty as it was, and the next start seeds
//! again from scratch.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use comptoir_core::{Collection, Entity, SeedSet};

use crate::error::{StorageError, StorageResult};
use crate::repository::collection::{count_rows, upsert};

/// What a bootstrap pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty; `records` were written.
    Seeded { records: usize },
    /// Products already existed; nothing was written.
    AlreadySeeded { products: i64 },
}

/// Populates an empty store with the canonical seed set.
#[derive(Debug, Clone)]
pub struct SeedBootstrapper {
    pool: SqlitePool,
}

impl SeedBootstrapper {
    pub fn new(pool: SqlitePool) -> Self {
        SeedBootstrapper { pool }
    }

    /// Seeds the store if and only if the product collection is empty.
    ///
    /// Calling this on a seeded store is a no-op.
    pub async fn seed_if_empty(&self, seed: &SeedSet) -> StorageResult<SeedOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::TransactionFailed(e.to_string()))?;

        let products = count_rows(&mut *tx, Collection::Products).await?;
        if products > 0 {
            info!(products, "Store already seeded");
            tx.rollback()
                .await
                .map_err(|e| StorageError::TransactionFailed(e.to_string()))?;
            return Ok(SeedOutcome::AlreadySeeded { products });
        }

        info!(records = seed.record_count(), "Seeding empty store");

        let mut records = 0;
        records += write_all(&mut tx, &seed.companies).await?;
        records += write_all(&mut tx, &seed.users).await?;
        records += write_all(&mut tx, &seed.products).await?;
        records += write_all(&mut tx, &seed.sales).await?;
        records += write_all(&mut tx, &seed.clients).await?;
        records += write_all(&mut tx, &seed.suppliers).await?;
        records += write_all(&mut tx, &seed.expenses).await?;

        if seed.products.is_empty() {
            // Nothing marks the store as seeded; the next start seeds again.
            warn!("Seed set has no products");
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::TransactionFailed(e.to_string()))?;

        info!(records, "Seed complete");
        Ok(SeedOutcome::Seeded { records })
    }
}

async fn write_all<E: Entity>(conn: &mut SqliteConnection, items: &[E]) -> StorageResult<usize> {
    for item in items {
        upsert(&mut *conn, item).await?;
    }
    Ok(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use comptoir_core::seed::canonical_seed;
    use comptoir_core::{Company, Product, User};

    #[tokio::test]
    async fn test_seeds_empty_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let seed = canonical_seed(Utc::now());

        let outcome = db.seeder().seed_if_empty(&seed).await.unwrap();
        assert_eq!(
            outcome,
            SeedOutcome::Seeded {
                records: seed.record_count()
            }
        );

        assert_eq!(db.count(Collection::Companies).await.unwrap(), 2);
        assert_eq!(db.count(Collection::Users).await.unwrap(), 5);
        assert_eq!(db.count(Collection::Products).await.unwrap(), 6);
        assert_eq!(db.count(Collection::Sales).await.unwrap(), 2);
        assert_eq!(db.count(Collection::ClientOrders).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seeding_twice_is_noop() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let seed = canonical_seed(Utc::now());

        db.seeder().seed_if_empty(&seed).await.unwrap();
        let products_before = db.collection::<Product>().get_all().await.unwrap();
        let users_before = db.collection::<User>().get_all().await.unwrap();

        let second = db.seeder().seed_if_empty(&seed).await.unwrap();
        assert_eq!(second, SeedOutcome::AlreadySeeded { products: 6 });

        assert_eq!(db.collection::<Product>().get_all().await.unwrap(), products_before);
        assert_eq!(db.collection::<User>().get_all().await.unwrap(), users_before);
    }

    #[tokio::test]
    async fn test_existing_products_block_seeding() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let seed = canonical_seed(Utc::now());
        db.collection::<Product>().put(&seed.products[0]).await.unwrap();

        let outcome = db.seeder().seed_if_empty(&seed).await.unwrap();
        assert_eq!(outcome, SeedOutcome::AlreadySeeded { products: 1 });
        assert_eq!(db.collection::<Company>().count().await.unwrap(), 0);
    }
}
