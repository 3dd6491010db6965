//! # comptoir-sync: Sync Gateway for Comptoir
//!
//! Decides, per call, whether a read or write may use the network, and
//! guarantees the local copy is durable before returning.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Sync Gateway                                    │
//! │                                                                         │
//! │  UI handler                                                            │
//! │       │  save_product / get_clients / delete_sale ...                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │ SyncGateway<R: RemoteBackend>                                   │   │
//! │  │                                                                 │   │
//! │  │   Connectivity ──► online?                                      │   │
//! │  │                                                                 │   │
//! │  │   Database (comptoir-db)        R (remote seam)                 │   │
//! │  │   ├── collection::<E>()  ◄───── always first                    │   │
//! │  │   └── sync_queue()       ◄───── offline / failed remote writes  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Reconnect ──► drain_queue(): replay oldest first, stop on failure     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Statuses
//!
//! | Situation                   | Local write | Queued | Status         |
//! |-----------------------------|-------------|--------|----------------|
//! | Online, remote acknowledges | yes         | no     | `Synced`       |
//! | Offline                     | yes         | yes    | `SavedLocally` |
//! | Online, remote fails/times  | yes         | yes    | `RemoteFailed` |
//! | Local store fails           | no          | no     | `Err(Storage)` |

pub mod config;
pub mod connectivity;
pub mod error;
pub mod gateway;
pub mod remote;

pub use config::{SyncConfig, SyncMode};
pub use connectivity::Connectivity;
pub use error::{RemoteError, RemoteResult, SyncError, SyncResult};
pub use gateway::{DrainReport, RemoveOutcome, SaveOutcome, SyncGateway, SyncStatus, WriteStatus};
pub use remote::{MemoryRemote, PlaceholderRemote, RemoteBackend, RemoteCall, RemoteRecord};
