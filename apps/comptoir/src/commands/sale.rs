//! # Sale Commands
//!
//! ## Checkout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         checkout()                                      │
//! │                                                                         │
//! │  1. Validate (nothing written yet)                                      │
//! │     • cart not empty, every product still in the active company         │
//! │     • stock covers every line, client (if any) belongs to the company   │
//! │                                                                         │
//! │  2. Compute totals from the cart snapshots and the company tax rate     │
//! │                                                                         │
//! │  3. Write through the gateway                                           │
//! │     • Sale (lines are the cart snapshots)                              │
//! │     • each Product: stock -= quantity                                  │
//! │     • Client: totalSpent += total, loyaltyPoints += ⌊total / 1000⌋      │
//! │                                                                         │
//! │  4. Clear the cart                                                      │
//! │                                                                         │
//! │  A remote failure in step 3 never undoes a local write; it becomes a   │
//! │  warning notice and a queued replay.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use comptoir_core::ids::new_id;
use comptoir_core::pricing::loyalty_points_for;
use comptoir_core::{Client, CoreError, Entity, PaymentDetails, Product, Sale};
use comptoir_sync::RemoteBackend;

use crate::context::AppContext;
use crate::error::ApiResult;

/// Checkout options. The client comes from the cart unless overridden here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub client_id: Option<String>,
    /// Defaults to cash paid in full.
    pub payment: Option<PaymentDetails>,
}

/// Turns the cart into a sale.
pub async fn checkout<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    request: CheckoutRequest,
) -> ApiResult<Sale> {
    let company = ctx.active_company()?.clone();
    let items = ctx.cart().items.clone();
    if items.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let mut products = Vec::with_capacity(items.len());
    for item in &items {
        let product = ctx.scoped_record::<Product>(&item.product_id)?;
        product.ensure_stock(item.quantity)?;
        products.push(product);
    }

    let client_id = request.client_id.or_else(|| ctx.cart().client_id.clone());
    let client = match client_id.as_deref() {
        Some(id) => Some(ctx.scoped_record::<Client>(id)?),
        None => None,
    };

    let totals = ctx.cart().totals(company.tax_rate());
    let mut sale = Sale {
        id: new_id(),
        company_id: String::new(),
        date: Utc::now(),
        items,
        subtotal: totals.subtotal.minor(),
        tax: totals.tax.minor(),
        total: totals.total.minor(),
        client_id: client.as_ref().map(|c| c.id.clone()),
        client_name: client.as_ref().map(|c| c.name.clone()),
        payment_info: Some(request.payment.unwrap_or_else(PaymentDetails::cash)),
    };
    sale.assign_company(&company.id);

    let sale = ctx.persist(&sale).await?;

    for (mut product, item) in products.into_iter().zip(&sale.items) {
        product.stock -= item.quantity;
        debug!(product_id = %product.id, stock = product.stock, "Stock decremented");
        ctx.persist(&product).await?;
    }

    if let Some(mut client) = client {
        client.total_spent += sale.total;
        client.loyalty_points += loyalty_points_for(sale.total());
        ctx.persist(&client).await?;
    }

    ctx.cart_mut().clear();

    info!(
        sale_id = %sale.id,
        company_id = %sale.company_id,
        total = sale.total,
        items = sale.items.len(),
        "Sale recorded"
    );
    Ok(sale)
}

/// Deletes a sale. Stock and client totals are left as they are.
pub async fn delete_sale<R: RemoteBackend>(ctx: &mut AppContext<R>, id: &str) -> ApiResult<()> {
    ctx.session().require_tenant()?;
    let sale = ctx.scoped_record::<Sale>(id)?;
    ctx.discard::<Sale>(&sale.id).await?;
    info!(sale_id = %id, "Sale deleted");
    Ok(())
}
