//! Shared fixtures for the application integration tests.

#![allow(dead_code)]

use comptoir_app::commands::{auth, product};
use comptoir_app::{AppConfig, AppContext};
use comptoir_app::state::CachedEntity;
use comptoir_core::{Category, Entity, Product};
use comptoir_sync::MemoryRemote;

/// A freshly seeded in-memory context, online, with its remote backend.
pub async fn context() -> (AppContext<MemoryRemote>, MemoryRemote) {
    context_with(AppConfig::in_memory()).await
}

pub async fn context_with(config: AppConfig) -> (AppContext<MemoryRemote>, MemoryRemote) {
    let remote = MemoryRemote::new();
    let ctx = AppContext::init(config, remote.clone())
        .await
        .expect("context should initialize");
    (ctx, remote)
}

/// Logs in as the manager of "Global Tech Solutions" (company 1).
pub async fn as_tech_manager(ctx: &mut AppContext<MemoryRemote>) {
    auth::login(ctx, "manager_tech", "123")
        .await
        .expect("seeded manager should log in");
}

/// Logs in as the manager of "Élégance Boutique" (company 2).
pub async fn as_fashion_manager(ctx: &mut AppContext<MemoryRemote>) {
    auth::login(ctx, "manager_mode", "123")
        .await
        .expect("seeded manager should log in");
}

pub async fn as_super_admin(ctx: &mut AppContext<MemoryRemote>) {
    auth::login(ctx, "superadmin", "admin")
        .await
        .expect("seeded super admin should log in");
}

/// A plain product input: no discount, no promotional price.
pub fn new_product(name: &str, price: i64, stock: i64) -> product::NewProduct {
    product::NewProduct {
        name: name.to_string(),
        category: Category::Electronics,
        price,
        purchase_cost: Some(price / 2),
        stock,
        description: String::new(),
        image: None,
        discount: 0,
        promotional_price: 0,
    }
}

/// Creates a product in the active company.
pub async fn create_product(
    ctx: &mut AppContext<MemoryRemote>,
    name: &str,
    price: i64,
    stock: i64,
) -> Product {
    product::create_product(ctx, new_product(name, price, stock), None)
        .await
        .expect("product should be created")
}

pub fn scoped_ids<E: CachedEntity>(ctx: &AppContext<MemoryRemote>) -> Vec<String> {
    let mut ids: Vec<String> = ctx
        .cache()
        .scoped_view::<E>()
        .iter()
        .map(|e| e.id().to_string())
        .collect();
    ids.sort();
    ids
}
