//! # Comptoir Application Library
//!
//! The application layer over the local store and the sync gateway: one
//! [`AppContext`] owning the state cache, session, cart and notices, and
//! the handlers that mutate it.
//!
//! ## Module Organization
//! ```text
//! comptoir_app/
//! ├── lib.rs          ◄─── You are here (exports, tracing setup)
//! ├── context.rs      ◄─── AppContext: init, teardown, write helpers
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cache.rs    ◄─── Raw collections + tenant-scoped views
//! │   ├── session.rs  ◄─── Logged-in user, active company
//! │   ├── cart.rs     ◄─── Cart lines (product snapshots)
//! │   ├── notices.rs  ◄─── User-facing notices
//! │   └── config.rs   ◄─── AppConfig
//! ├── commands/       ◄─── Handlers (see commands/mod.rs)
//! └── error.rs        ◄─── ApiError returned by every handler
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use comptoir_app::{commands, AppConfig, AppContext};
//! use comptoir_sync::PlaceholderRemote;
//!
//! let mut ctx = AppContext::init(AppConfig::in_memory(), PlaceholderRemote::new(None)).await?;
//! commands::auth::login(&mut ctx, "manager_tech", "123").await?;
//! let products = ctx.cache().scoped_view::<comptoir_core::Product>();
//! ```

pub mod commands;
pub mod context;
pub mod error;
pub mod state;

pub use context::AppContext;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::{AppConfig, Cart, CartView, Notice, NoticeLevel, Session, StateCache};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=comptoir=trace` - Show trace for comptoir crates only
/// - Default: INFO, DEBUG for comptoir crates
///
/// Calling it again is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,comptoir=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
