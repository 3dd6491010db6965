//! # Commands Module
//!
//! Mutation and query handlers over an [`AppContext`](crate::AppContext).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── auth.rs      ◄─── Login, logout, company selection
//! ├── product.rs   ◄─── Product CRUD, pricing override resolution
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── sale.rs      ◄─── Checkout
//! ├── order.rs     ◄─── Client orders (quotes)
//! ├── supplier.rs  ◄─── Suppliers, purchase orders, goods receipt
//! ├── client.rs    ◄─── Client CRUD
//! ├── expense.rs   ◄─── Expenses
//! ├── company.rs   ◄─── Company settings, settings PIN
//! ├── user.rs      ◄─── Staff accounts
//! └── sync.rs      ◄─── Connectivity and sync queue
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  caller                                                                 │
//! │    │  create_product(&mut ctx, input, None)                             │
//! │    ▼                                                                    │
//! │  session.require_tenant()  ── no active company ──► NO_ACTIVE_TENANT    │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  core rules (validation, stock, transitions)  ──► ApiError             │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  ctx.persist(&record)                                                   │
//! │    • stamps nothing: the handler already assigned the company          │
//! │    • gateway.save ──► local store, then remote or queue                │
//! │    • cache.upsert ──► scoped views refreshed                           │
//! │    • WriteStatus ──► notice                                            │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  Result<T, ApiError> (serializes as { code, message })                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod cart;
pub mod client;
pub mod company;
pub mod expense;
pub mod order;
pub mod product;
pub mod sale;
pub mod supplier;
pub mod sync;
pub mod user;
