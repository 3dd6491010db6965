//! Checkout: sale recording, stock decrement, client credit.

mod common;

use comptoir_app::commands::{cart, product, sale};
use comptoir_app::ErrorCode;
use comptoir_core::{Client, PaymentMethod, Product, Sale};

use common::{as_tech_manager, context, create_product};

#[tokio::test]
async fn test_checkout_records_sale_and_credits_client() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    let usb = create_product(&mut ctx, "Clé USB 32GB", 1000, 10).await;
    cart::add_to_cart(&mut ctx, &usb.id, 2).await.unwrap();
    cart::attach_client(&mut ctx, Some("1")).await.unwrap();

    let view = cart::get_cart(&ctx).await.unwrap();
    assert_eq!(view.totals.subtotal.minor(), 2000);
    assert_eq!(view.totals.tax.minor(), 360);
    assert_eq!(view.totals.total.minor(), 2360);

    let recorded = sale::checkout(&mut ctx, sale::CheckoutRequest::default())
        .await
        .unwrap();

    assert_eq!(recorded.company_id, "1");
    assert_eq!(recorded.total, 2360);
    assert_eq!(recorded.client_id.as_deref(), Some("1"));
    assert_eq!(recorded.items.len(), 1);
    assert_eq!(recorded.items[0].quantity, 2);
    let payment = recorded.payment_info.as_ref().unwrap();
    assert_eq!(payment.method, PaymentMethod::Cash);

    let stocked = ctx.cache().find_scoped::<Product>(&usb.id).unwrap();
    assert_eq!(stocked.stock, 8);

    let client = ctx.cache().find_scoped::<Client>("1").unwrap();
    assert_eq!(client.total_spent, 4_502_360);
    assert_eq!(client.loyalty_points, 122);

    assert!(ctx.cart().is_empty());
    assert!(ctx.cart().client_id.is_none());

    // The store agrees with the cache.
    let stored = ctx.gateway().get_products().await.unwrap();
    let stored_usb = stored.iter().find(|p| p.id == usb.id).unwrap();
    assert_eq!(stored_usb.stock, 8);
    let sales = ctx.gateway().get_sales().await.unwrap();
    assert!(sales.iter().any(|s| s.id == recorded.id));
}

#[tokio::test]
async fn test_checkout_without_client_leaves_clients_untouched() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    cart::add_to_cart(&mut ctx, "3", 1).await.unwrap();
    let recorded = sale::checkout(&mut ctx, sale::CheckoutRequest::default())
        .await
        .unwrap();

    assert!(recorded.client_id.is_none());
    assert!(recorded.client_name.is_none());
    let client = ctx.cache().find_scoped::<Client>("1").unwrap();
    assert_eq!(client.total_spent, 4_500_000);
    assert_eq!(client.loyalty_points, 120);
}

#[tokio::test]
async fn test_checkout_empty_cart_is_rejected() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    let err = sale::checkout(&mut ctx, sale::CheckoutRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);
}

#[tokio::test]
async fn test_checkout_rechecks_stock() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;
    let sales_before = ctx.cache().scoped_view::<Sale>().len();

    // MacBook Air M2, 5 in stock.
    cart::add_to_cart(&mut ctx, "2", 3).await.unwrap();
    product::update_product(
        &mut ctx,
        "2",
        product::ProductPatch {
            stock: Some(1),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();

    let err = sale::checkout(&mut ctx, sale::CheckoutRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);

    assert_eq!(ctx.cache().scoped_view::<Sale>().len(), sales_before);
    assert_eq!(ctx.cache().find_scoped::<Product>("2").unwrap().stock, 1);
    assert_eq!(ctx.cart().item_count(), 1);
}

#[tokio::test]
async fn test_cart_rejects_quantity_above_stock() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    let err = cart::add_to_cart(&mut ctx, "2", 6).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert!(ctx.cart().is_empty());
}

#[tokio::test]
async fn test_cart_lines_keep_price_snapshot() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    cart::add_to_cart(&mut ctx, "1", 1).await.unwrap();
    product::update_product(
        &mut ctx,
        "1",
        product::ProductPatch {
            price: Some(500_000),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();

    let recorded = sale::checkout(&mut ctx, sale::CheckoutRequest::default())
        .await
        .unwrap();
    assert_eq!(recorded.items[0].unit_price, 450_000);
    assert_eq!(recorded.subtotal, 450_000);
}

#[tokio::test]
async fn test_deleting_sale_does_not_restore_stock() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    cart::add_to_cart(&mut ctx, "1", 2).await.unwrap();
    let recorded = sale::checkout(&mut ctx, sale::CheckoutRequest::default())
        .await
        .unwrap();
    assert_eq!(ctx.cache().find_scoped::<Product>("1").unwrap().stock, 10);

    sale::delete_sale(&mut ctx, &recorded.id).await.unwrap();

    assert!(ctx.cache().find_scoped::<Sale>(&recorded.id).is_none());
    assert_eq!(ctx.cache().find_scoped::<Product>("1").unwrap().stock, 10);
}

#[tokio::test]
async fn test_checkout_requires_login() {
    let (mut ctx, _remote) = context().await;

    let err = sale::checkout(&mut ctx, sale::CheckoutRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
}
