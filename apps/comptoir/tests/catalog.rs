//! Products, clients, expenses, companies and users.

mod common;

use chrono::NaiveDate;

use comptoir_app::commands::{client, company, expense, product, user};
use comptoir_app::ErrorCode;
use comptoir_core::{
    ClientType, ExpenseCategory, PricingChoice, Product, UserRole,
};

use common::{as_fashion_manager, as_tech_manager, context, new_product, scoped_ids};

fn conflicting(name: &str) -> product::NewProduct {
    product::NewProduct {
        discount: 10,
        promotional_price: 30_000,
        ..new_product(name, 35_000, 5)
    }
}

#[tokio::test]
async fn test_pricing_conflict_requires_a_choice() {
    let (mut ctx, _remote) = context().await;
    as_fashion_manager(&mut ctx).await;
    let before = scoped_ids::<Product>(&ctx);

    let err = product::create_product(&mut ctx, conflicting("Sac Cuir"), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PricingConflict);
    assert_eq!(scoped_ids::<Product>(&ctx), before);

    let kept_discount =
        product::create_product(&mut ctx, conflicting("Sac Cuir"), Some(PricingChoice::KeepDiscount))
            .await
            .unwrap();
    assert_eq!(kept_discount.discount, 10);
    assert_eq!(kept_discount.promotional_price, 0);

    let kept_promo = product::create_product(
        &mut ctx,
        conflicting("Sac Toile"),
        Some(PricingChoice::KeepPromotion),
    )
    .await
    .unwrap();
    assert_eq!(kept_promo.discount, 0);
    assert_eq!(kept_promo.promotional_price, 30_000);
}

#[tokio::test]
async fn test_update_introducing_conflict_is_rejected() {
    let (mut ctx, _remote) = context().await;
    as_fashion_manager(&mut ctx).await;

    // "Escarpins Cuir Noir" already carries a 10% discount.
    let patch = product::ProductPatch {
        promotional_price: Some(30_000),
        ..Default::default()
    };
    let err = product::update_product(&mut ctx, "202", patch.clone(), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PricingConflict);
    assert_eq!(ctx.cache().find_scoped::<Product>("202").unwrap().promotional_price, 0);

    let resolved = product::update_product(&mut ctx, "202", patch, Some(PricingChoice::KeepPromotion))
        .await
        .unwrap();
    assert_eq!(resolved.discount, 0);
    assert_eq!(resolved.promotional_price, 30_000);
}

#[tokio::test]
async fn test_resolution_without_conflict_changes_nothing() {
    let (mut ctx, _remote) = context().await;
    as_fashion_manager(&mut ctx).await;

    let updated = product::update_product(
        &mut ctx,
        "202",
        product::ProductPatch {
            stock: Some(20),
            ..Default::default()
        },
        Some(PricingChoice::KeepPromotion),
    )
    .await
    .unwrap();
    assert_eq!(updated.discount, 10);
    assert_eq!(updated.stock, 20);
}

#[tokio::test]
async fn test_invalid_product_is_rejected() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    let err = product::create_product(&mut ctx, new_product("   ", 1000, 1), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = product::create_product(&mut ctx, new_product("Câble", 1000, -1), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn test_client_crud_keeps_loyalty() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    let input = client::ClientInput {
        name: "Boutique Sandaga".to_string(),
        email: "contact@sandaga.sn".to_string(),
        phone: "+221 77 000 00 00".to_string(),
        address: None,
        client_type: ClientType::Reseller,
        notes: None,
    };
    let created = client::create_client(&mut ctx, input.clone()).await.unwrap();
    assert_eq!(created.company_id, "1");
    assert_eq!(created.loyalty_points, 0);
    assert_eq!(created.total_spent, 0);

    let seeded = client::update_client(
        &mut ctx,
        "1",
        client::ClientInput {
            name: "Cabinet Avocats".to_string(),
            ..input
        },
    )
    .await
    .unwrap();
    assert_eq!(seeded.name, "Cabinet Avocats");
    assert_eq!(seeded.loyalty_points, 120);
    assert_eq!(seeded.total_spent, 4_500_000);

    client::delete_client(&mut ctx, &created.id).await.unwrap();
    assert_eq!(scoped_ids::<comptoir_core::Client>(&ctx), vec!["1"]);
}

#[tokio::test]
async fn test_expense_is_declared_by_current_user() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    let input = expense::ExpenseInput {
        date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        category: ExpenseCategory::Utilities,
        amount: 45_000,
        description: "Facture Senelec".to_string(),
    };
    let recorded = expense::record_expense(&mut ctx, input.clone()).await.unwrap();
    assert_eq!(recorded.declared_by, "Moussa Diop");
    assert_eq!(recorded.company_id, "1");

    let err = expense::record_expense(
        &mut ctx,
        expense::ExpenseInput { amount: 0, ..input },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn test_settings_pin() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    assert!(company::verify_settings_pin(&ctx, "1234").await.unwrap());
    assert!(!company::verify_settings_pin(&ctx, "0000").await.unwrap());

    let err = company::set_settings_pin(&mut ctx, "12").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    company::set_settings_pin(&mut ctx, "9876").await.unwrap();
    assert!(company::verify_settings_pin(&ctx, "9876").await.unwrap());
    assert!(!company::verify_settings_pin(&ctx, "1234").await.unwrap());
}

#[tokio::test]
async fn test_company_settings_update_tax_rate() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    let updated = company::update_company(
        &mut ctx,
        company::CompanySettings {
            tax_rate_bps: Some(1000),
            footer_message: Some("Merci !".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.tax_rate_bps, 1000);
    assert_eq!(ctx.active_company().unwrap().footer_message, "Merci !");

    let err = company::update_company(
        &mut ctx,
        company::CompanySettings {
            tax_rate_bps: Some(20_000),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn test_sales_staff_cannot_manage_company() {
    let (mut ctx, _remote) = context().await;
    comptoir_app::commands::auth::login(&mut ctx, "vente_tech", "123")
        .await
        .unwrap();

    let err = company::set_settings_pin(&mut ctx, "5555").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
}

#[tokio::test]
async fn test_user_management() {
    let (mut ctx, _remote) = context().await;
    as_tech_manager(&mut ctx).await;

    let input = user::UserInput {
        name: "Ibrahima Sarr".to_string(),
        username: "stock_tech".to_string(),
        role: UserRole::InventoryManager,
        avatar: None,
        password: Some("secret".to_string()),
    };
    let created = user::create_user(&mut ctx, input.clone()).await.unwrap();
    assert_eq!(created.company_id.as_deref(), Some("1"));

    let err = user::create_user(&mut ctx, input.clone()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = user::create_user(
        &mut ctx,
        user::UserInput {
            username: "boss".to_string(),
            role: UserRole::SuperAdmin,
            ..input
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);

    let err = user::delete_user(&mut ctx, "1").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    user::delete_user(&mut ctx, &created.id).await.unwrap();
    assert_eq!(scoped_ids::<comptoir_core::User>(&ctx), vec!["1", "2"]);
}
