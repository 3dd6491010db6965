//! # comptoir-db: Durable Local Store for Comptoir
//!
//! The system of record while offline. Every entity kind has its own SQLite
//! table keyed by the entity identifier; the record itself is stored as
//! JSON and replaced wholesale on every write.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Comptoir Data Flow                               │
//! │                                                                         │
//! │  SyncGateway (comptoir-sync)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   comptoir-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │    │                    │  │ (embedded) │  │   │
//! │  │   │               │◄───│ CollectionRepo<E>  │  │            │  │   │
//! │  │   │ SqlitePool    │    │ SyncQueueRepo      │  │ 001_*.sql  │  │   │
//! │  │   │               │    │ SeedBootstrapper   │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store does not filter by tenant. Visibility is decided by
//! `comptoir_core::tenant` on top of what this crate returns.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use comptoir_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/comptoir.db")).await?;
//! db.seeder().seed_if_empty(&canonical_seed(Utc::now())).await?;
//!
//! let products = db.collection::<Product>().get_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StorageError, StorageResult};
pub use pool::{Database, DbConfig};
pub use repository::collection::CollectionRepository;
pub use repository::sync_queue::SyncQueueRepository;
pub use seed::{SeedBootstrapper, SeedOutcome};
