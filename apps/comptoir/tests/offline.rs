//! Offline fallback, queue replay, remote mirroring and durability.

mod common;

use comptoir_app::commands::{cart, product, sale, sync};
use comptoir_app::{AppConfig, NoticeLevel};
use comptoir_core::{Category, Client, Collection, Product};
use comptoir_sync::{RemoteRecord, SyncMode};

use common::{as_tech_manager, context, context_with, create_product, scoped_ids};

#[tokio::test]
async fn test_offline_writes_are_local_then_replayed() {
    let (mut ctx, remote) = context_with(AppConfig::in_memory().offline()).await;
    as_tech_manager(&mut ctx).await;

    let created = create_product(&mut ctx, "Disque SSD 1TB", 65_000, 15).await;

    assert!(scoped_ids::<Product>(&ctx).contains(&created.id));
    assert_eq!(remote.len(Collection::Products), 0);
    assert_eq!(ctx.gateway().pending_count().await.unwrap(), 1);

    let notices = ctx.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert!(notices[0].message.contains("saved locally"));

    let report = sync::set_online(&mut ctx, true).await.unwrap().unwrap();
    assert_eq!(report.replayed, 1);
    assert_eq!(report.remaining, 0);
    assert!(report.failed.is_none());

    assert!(remote.get(Collection::Products, &created.id).is_some());
    assert_eq!(ctx.gateway().pending_count().await.unwrap(), 0);

    let status = sync::sync_status(&ctx).await.unwrap();
    assert!(status.online);
    assert_eq!(status.mode, SyncMode::Auto);
    assert_eq!(status.pending, 0);
}

#[tokio::test]
async fn test_offline_checkout_queues_every_write() {
    let (mut ctx, remote) = context_with(AppConfig::in_memory().offline()).await;
    as_tech_manager(&mut ctx).await;

    cart::add_to_cart(&mut ctx, "1", 1).await.unwrap();
    cart::attach_client(&mut ctx, Some("1")).await.unwrap();
    sale::checkout(&mut ctx, sale::CheckoutRequest::default())
        .await
        .unwrap();

    // Sale, product stock, client credit.
    assert_eq!(ctx.gateway().pending_count().await.unwrap(), 3);
    assert!(remote.is_empty());

    sync::set_online(&mut ctx, true).await.unwrap();
    assert_eq!(remote.len(Collection::Sales), 1);
    assert_eq!(remote.len(Collection::Products), 1);
    assert_eq!(remote.len(Collection::Clients), 1);
}

#[tokio::test]
async fn test_remote_failure_keeps_local_write() {
    let (mut ctx, remote) = context().await;
    as_tech_manager(&mut ctx).await;
    remote.set_reachable(false);

    let created = create_product(&mut ctx, "Écran 24 pouces", 90_000, 6).await;

    assert!(ctx.cache().find_scoped::<Product>(&created.id).is_some());
    let stored = ctx.gateway().get_products().await.unwrap();
    assert!(stored.iter().any(|p| p.id == created.id));
    assert_eq!(ctx.gateway().pending_count().await.unwrap(), 1);

    let notices = ctx.drain_notices();
    assert!(notices.iter().any(|n| n.level == NoticeLevel::Warning));

    remote.set_reachable(true);
    let report = sync::drain_sync_queue(&mut ctx).await.unwrap();
    assert_eq!(report.replayed, 1);
    assert!(remote.get(Collection::Products, &created.id).is_some());
}

#[tokio::test]
async fn test_drain_stops_at_first_failure() {
    let (mut ctx, remote) = context_with(AppConfig::in_memory().offline()).await;
    as_tech_manager(&mut ctx).await;

    create_product(&mut ctx, "Clavier", 12_000, 10).await;
    create_product(&mut ctx, "Webcam", 25_000, 4).await;
    remote.set_reachable(false);

    let report = sync::set_online(&mut ctx, true).await.unwrap().unwrap();
    assert_eq!(report.replayed, 0);
    assert!(report.failed.is_some());
    assert_eq!(report.remaining, 2);
    assert!(ctx
        .drain_notices()
        .iter()
        .any(|n| n.level == NoticeLevel::Warning && n.message.contains("Sync stopped")));

    remote.set_reachable(true);
    let report = sync::drain_sync_queue(&mut ctx).await.unwrap();
    assert_eq!(report.replayed, 2);
    assert_eq!(report.remaining, 0);
    assert_eq!(remote.len(Collection::Products), 2);
}

#[tokio::test]
async fn test_going_offline_does_not_drain() {
    let (mut ctx, _remote) = context().await;

    let report = sync::set_online(&mut ctx, false).await.unwrap();
    assert!(report.is_none());
    assert!(!ctx.gateway().is_online());
}

#[tokio::test]
async fn test_reload_mirrors_remote_records() {
    let (mut ctx, remote) = context().await;
    as_tech_manager(&mut ctx).await;

    let from_other_device = Product {
        id: "remote-1".to_string(),
        company_id: "1".to_string(),
        name: "Imprimante Laser".to_string(),
        category: Category::Electronics,
        price: 180_000,
        purchase_cost: None,
        stock: 3,
        description: String::new(),
        image: None,
        discount: 0,
        promotional_price: 0,
    };
    remote.insert(RemoteRecord::from_entity(&from_other_device).unwrap());

    ctx.reload().await.unwrap();

    assert!(scoped_ids::<Product>(&ctx).contains(&"remote-1".to_string()));
    // Seeded records the remote never heard of are kept.
    assert!(scoped_ids::<Product>(&ctx).contains(&"1".to_string()));
}

#[tokio::test]
async fn test_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::in_memory()
        .with_database_path(dir.path().join("comptoir.db"))
        .offline();

    let (mut ctx, _remote) = context_with(config.clone()).await;
    as_tech_manager(&mut ctx).await;
    let created = create_product(&mut ctx, "Routeur Wi-Fi", 40_000, 9).await;
    cart::add_to_cart(&mut ctx, "1", 1).await.unwrap();
    cart::attach_client(&mut ctx, Some("1")).await.unwrap();
    sale::checkout(&mut ctx, sale::CheckoutRequest::default())
        .await
        .unwrap();
    ctx.teardown().await;

    let (mut reopened, _remote) = context_with(config).await;
    as_tech_manager(&mut reopened).await;

    // Not re-seeded: the new product and the checkout effects are still there.
    assert!(scoped_ids::<Product>(&reopened).contains(&created.id));
    assert_eq!(reopened.cache().find_scoped::<Product>("1").unwrap().stock, 11);
    let client = reopened.cache().find_scoped::<Client>("1").unwrap();
    assert_eq!(client.total_spent, 4_500_000 + 531_000);
    // Queued writes survive too.
    assert_eq!(reopened.gateway().pending_count().await.unwrap(), 4);

    product::delete_product(&mut reopened, &created.id).await.unwrap();
    assert!(!scoped_ids::<Product>(&reopened).contains(&created.id));
    reopened.teardown().await;
}
