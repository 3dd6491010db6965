//! # State Module
//!
//! The pieces of state an [`AppContext`](crate::AppContext) owns.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  ┌──────────────┐  │
//! │  │  StateCache  │  │   Session    │  │    Cart    │  │   Notices    │  │
//! │  │              │  │              │  │            │  │              │  │
//! │  │  raw + views │  │  user        │  │  snapshot  │  │  info        │  │
//! │  │  per kind    │  │  company     │  │  lines     │  │  warning     │  │
//! │  │  revision    │  │  → scope     │  │  client    │  │  error       │  │
//! │  └──────────────┘  └──────────────┘  └────────────┘  └──────────────┘  │
//! │                                                                         │
//! │  AppConfig: read once at startup (db path, initial connectivity, sync) │
//! │                                                                         │
//! │  Handlers run one at a time against `&mut AppContext`, so none of      │
//! │  these need locks.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cache;
mod cart;
mod config;
mod notices;
mod session;

pub use cache::{CachedEntity, Collections, StateCache};
pub use cart::{Cart, CartView};
pub use config::AppConfig;
pub use notices::{Notice, NoticeLevel, Notices};
pub use session::Session;
