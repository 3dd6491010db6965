//! # Comptoir Entry Point
//!
//! Opens (and on first run seeds) the local store, loads every collection,
//! and prints a per-company summary with the sync status.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Read configuration (`COMPTOIR_*` env vars, `sync.toml`)
//! 3. Build the remote backend from the configured URL
//! 4. Open the store, seed it if empty, load the state cache
//! 5. Print the summary, close the store

use std::process::ExitCode;

use serde_json::json;
use tracing::error;

use comptoir_app::{init_tracing, ApiResult, AppConfig, AppContext};
use comptoir_core::{
    Client, ClientOrder, Company, Expense, Product, Sale, Supplier, SupplierInvoice,
    SupplierOrder, TenantScope, User,
};
use comptoir_sync::PlaceholderRemote;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(code = ?err.code, error = %err.message, "Startup failed");
            eprintln!("comptoir: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ApiResult<()> {
    let config = AppConfig::from_env()?;
    let remote = PlaceholderRemote::new(config.sync.remote_url()?);
    let ctx = AppContext::init(config, remote).await?;

    let cache = ctx.cache();
    let companies: Vec<_> = cache
        .raw::<Company>()
        .iter()
        .map(|company| {
            let scope = TenantScope::tenant(company.id.clone());
            json!({
                "id": company.id,
                "name": company.name,
                "currency": company.currency_symbol,
                "users": cache.scoped_view_for::<User>(&scope).len(),
                "products": cache.scoped_view_for::<Product>(&scope).len(),
                "sales": cache.scoped_view_for::<Sale>(&scope).len(),
                "clients": cache.scoped_view_for::<Client>(&scope).len(),
                "suppliers": cache.scoped_view_for::<Supplier>(&scope).len(),
                "expenses": cache.scoped_view_for::<Expense>(&scope).len(),
                "clientOrders": cache.scoped_view_for::<ClientOrder>(&scope).len(),
                "supplierOrders": cache.scoped_view_for::<SupplierOrder>(&scope).len(),
                "supplierInvoices": cache.scoped_view_for::<SupplierInvoice>(&scope).len(),
            })
        })
        .collect();

    let status = ctx.gateway().status().await?;
    let summary = json!({
        "database": ctx.config().database_path,
        "companies": companies,
        "sync": status,
    });

    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{}", text),
        Err(err) => error!(error = %err, "Summary could not be rendered"),
    }

    ctx.teardown().await;
    Ok(())
}
