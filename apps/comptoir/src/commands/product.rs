//! # Product Commands
//!
//! Create, update and delete products of the active company.
//!
//! ## Pricing Overrides
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  discount > 0 AND promotional_price > 0 ?                               │
//! │       │                                                                 │
//! │       ├── no  ──► validate ──► save                                    │
//! │       │                                                                 │
//! │       └── yes ──► resolution given?                                    │
//! │                     ├── no  ──► PRICING_CONFLICT (nothing saved)        │
//! │                     ├── KeepDiscount  ──► promotional price cleared    │
//! │                     └── KeepPromotion ──► discount cleared             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The store never picks a winner on its own.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use comptoir_core::ids::new_id;
use comptoir_core::validation::validate_product;
use comptoir_core::{Category, Entity, PricingChoice, Product};
use comptoir_sync::RemoteBackend;

use crate::context::AppContext;
use crate::error::ApiResult;

/// Input for a new product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: Category,
    pub price: i64,
    pub purchase_cost: Option<i64>,
    pub stock: i64,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
    #[serde(default)]
    pub discount: u32,
    #[serde(default)]
    pub promotional_price: i64,
}

/// Named fields to change on an existing product. `None` leaves a field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub price: Option<i64>,
    pub purchase_cost: Option<i64>,
    pub stock: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub discount: Option<u32>,
    pub promotional_price: Option<i64>,
}

impl ProductPatch {
    fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(cost) = self.purchase_cost {
            product.purchase_cost = Some(cost);
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(image) = self.image {
            product.image = Some(image);
        }
        if let Some(discount) = self.discount {
            product.discount = discount;
        }
        if let Some(promotional_price) = self.promotional_price {
            product.promotional_price = promotional_price;
        }
    }
}

/// Creates a product in the active company.
///
/// Fails with `PRICING_CONFLICT` when both overrides are set and no
/// `resolution` is given.
pub async fn create_product<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    input: NewProduct,
    resolution: Option<PricingChoice>,
) -> ApiResult<Product> {
    let company_id = ctx.session().require_tenant()?.to_string();

    let mut product = Product {
        id: new_id(),
        company_id: String::new(),
        name: input.name.trim().to_string(),
        category: input.category,
        price: input.price,
        purchase_cost: input.purchase_cost,
        stock: input.stock,
        description: input.description,
        image: input.image,
        discount: input.discount,
        promotional_price: input.promotional_price,
    };
    product.assign_company(&company_id);

    let stored = save_checked(ctx, product, resolution).await?;
    info!(product_id = %stored.id, company_id = %company_id, "Product created");
    Ok(stored)
}

/// Applies `patch` to a product of the active company.
pub async fn update_product<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    id: &str,
    patch: ProductPatch,
    resolution: Option<PricingChoice>,
) -> ApiResult<Product> {
    ctx.session().require_tenant()?;
    let mut product = ctx.scoped_record::<Product>(id)?;
    patch.apply(&mut product);

    let stored = save_checked(ctx, product, resolution).await?;
    debug!(product_id = %stored.id, "Product updated");
    Ok(stored)
}

/// Deletes a product. Past sales keep their snapshot lines.
pub async fn delete_product<R: RemoteBackend>(ctx: &mut AppContext<R>, id: &str) -> ApiResult<()> {
    ctx.session().require_tenant()?;
    let product = ctx.scoped_record::<Product>(id)?;
    ctx.discard::<Product>(&product.id).await?;
    info!(product_id = %id, "Product deleted");
    Ok(())
}

async fn save_checked<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    mut product: Product,
    resolution: Option<PricingChoice>,
) -> ApiResult<Product> {
    if let Some(choice) = resolution.filter(|_| product.has_pricing_conflict()) {
        product.resolve_pricing(choice);
    }
    validate_product(&product)?;
    ctx.persist(&product).await
}
