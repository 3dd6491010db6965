//! Tenant isolation and scope switching.

mod common;

use comptoir_app::commands::{auth, cart, company, product};
use comptoir_app::ErrorCode;
use comptoir_core::{Client, Company, Product, Sale, User, DEFAULT_TAX_RATE_BPS};

use common::{
    as_fashion_manager, as_super_admin, as_tech_manager, context, create_product, scoped_ids,
};

#[tokio::test]
async fn test_company_user_sees_only_own_records() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    assert_eq!(scoped_ids::<Product>(&ctx), vec!["1", "2", "3"]);
    assert_eq!(scoped_ids::<Client>(&ctx), vec!["1"]);
    assert_eq!(scoped_ids::<Sale>(&ctx), vec!["1001"]);
    assert_eq!(scoped_ids::<User>(&ctx), vec!["1", "2"]);
    // The company list is never filtered.
    assert_eq!(scoped_ids::<Company>(&ctx), vec!["1", "2"]);

    as_fashion_manager(&mut ctx).await;
    assert_eq!(scoped_ids::<Product>(&ctx), vec!["201", "202", "203"]);
    assert_eq!(scoped_ids::<Client>(&ctx), vec!["3"]);
}

#[tokio::test]
async fn test_other_tenant_records_are_not_found() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    let err = cart::add_to_cart(&mut ctx, "201", 1).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = cart::attach_client(&mut ctx, Some("3")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = product::delete_product(&mut ctx, "203").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert!(ctx.cache().find::<Product>("203").is_some());
}

#[tokio::test]
async fn test_created_records_are_stamped_with_active_company() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    let created = create_product(&mut ctx, "Souris sans fil", 8000, 40).await;
    assert_eq!(created.company_id, "1");

    as_fashion_manager(&mut ctx).await;
    assert!(!scoped_ids::<Product>(&ctx).contains(&created.id));
}

#[tokio::test]
async fn test_super_admin_starts_without_tenant() {
    let (mut ctx, _remote) = context().await;
    as_super_admin(&mut ctx).await;

    assert!(ctx.session().active_company_id().is_none());
    assert!(scoped_ids::<Product>(&ctx).is_empty());
    assert!(scoped_ids::<Sale>(&ctx).is_empty());
    // Only the tenantless super administrator shows with no company active.
    assert_eq!(scoped_ids::<User>(&ctx), vec!["0"]);

    let err = cart::add_to_cart(&mut ctx, "1", 1).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NoActiveTenant);
}

#[tokio::test]
async fn test_new_company_starts_empty_and_isolated() {
    let (mut ctx, _remote) = context().await;
    as_super_admin(&mut ctx).await;

    let created = company::create_company(
        &mut ctx,
        company::NewCompany {
            name: "Boulangerie du Port".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(created.tax_rate_bps, DEFAULT_TAX_RATE_BPS);
    assert_eq!(created.currency_symbol, "FCFA");

    auth::select_company(&mut ctx, &created.id).await.unwrap();
    assert!(scoped_ids::<Product>(&ctx).is_empty());
    assert!(scoped_ids::<Client>(&ctx).is_empty());

    let bread = create_product(&mut ctx, "Baguette", 150, 200).await;
    assert_eq!(bread.company_id, created.id);
    assert_eq!(scoped_ids::<Product>(&ctx), vec![bread.id.clone()]);

    auth::select_company(&mut ctx, "1").await.unwrap();
    assert!(!scoped_ids::<Product>(&ctx).contains(&bread.id));
}

#[tokio::test]
async fn test_scope_switch_rebuilds_views_and_clears_cart() {
    let (mut ctx, _remote) = context().await;
    as_super_admin(&mut ctx).await;

    auth::select_company(&mut ctx, "1").await.unwrap();
    cart::add_to_cart(&mut ctx, "1", 1).await.unwrap();
    let revision = ctx.cache().revision();

    auth::select_company(&mut ctx, "2").await.unwrap();

    assert!(ctx.cache().revision() > revision);
    assert!(ctx.cart().is_empty());
    assert_eq!(scoped_ids::<Product>(&ctx), vec!["201", "202", "203"]);

    // Company 2 has no tax.
    cart::add_to_cart(&mut ctx, "203", 1).await.unwrap();
    let view = cart::get_cart(&ctx).await.unwrap();
    assert_eq!(view.totals.tax.minor(), 0);
    assert_eq!(view.totals.total.minor(), 60_000);

    auth::leave_company(&mut ctx).await.unwrap();
    assert!(scoped_ids::<Product>(&ctx).is_empty());
    assert!(ctx.cart().is_empty());
}

#[tokio::test]
async fn test_only_super_admin_switches_company() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    let err = auth::select_company(&mut ctx, "2").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert_eq!(ctx.session().active_company_id(), Some("1"));

    let err = company::create_company(
        &mut ctx,
        company::NewCompany {
            name: "Intrus".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
}

#[tokio::test]
async fn test_company_with_records_cannot_be_deleted() {
    let (mut ctx, _remote) = context().await;
    as_super_admin(&mut ctx).await;

    let err = company::delete_company(&mut ctx, "2").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);
    assert!(ctx.cache().find::<Company>("2").is_some());
    assert!(ctx.cache().find::<Product>("201").is_some());

    let empty = company::create_company(
        &mut ctx,
        company::NewCompany {
            name: "Atelier Fermé".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    company::delete_company(&mut ctx, &empty.id).await.unwrap();
    assert!(ctx.cache().find::<Company>(&empty.id).is_none());
    assert_eq!(scoped_ids::<Company>(&ctx), vec!["1", "2"]);
}

#[tokio::test]
async fn test_logout_drops_scope() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;
    cart::add_to_cart(&mut ctx, "3", 1).await.unwrap();

    auth::logout(&mut ctx).await;

    assert!(!ctx.session().is_logged_in());
    assert!(ctx.cart().is_empty());
    assert!(scoped_ids::<Product>(&ctx).is_empty());
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (mut ctx, _remote) = context().await;

    let err = auth::login(&mut ctx, "manager_tech", "wrong").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
    let err = auth::login(&mut ctx, "nobody", "123").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert!(!ctx.session().is_logged_in());
}
