//! # Repository Module
//!
//! Typed access to the durable collections.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Repository, Ten Collections                      │
//! │                                                                         │
//! │  SyncGateway::save(product)                                            │
//! │       │                                                                 │
//! │       │  db.collection::<Product>().put(&product)                      │
//! │       ▼                                                                 │
//! │  CollectionRepository<Product>                                         │
//! │  ├── get_all(&self)                                                    │
//! │  ├── get(&self, id)                                                    │
//! │  ├── put(&self, entity)       full replace, never a merge              │
//! │  ├── put_many(&self, items)   one transaction                          │
//! │  ├── delete(&self, id)        no-op when absent                        │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  Entity::COLLECTION.table() → "products"                        │
//! │       ▼                                                                 │
//! │  products(id, company_id, payload JSON, updated_at)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Table names come from the closed [`Collection`](comptoir_core::Collection)
//! enum, never from caller input.
//!
//! ## Available Repositories
//!
//! - [`CollectionRepository`](collection::CollectionRepository) - Entity CRUD
//! - [`SyncQueueRepository`](sync_queue::SyncQueueRepository) - Pending remote writes

pub mod collection;
pub mod sync_queue;
