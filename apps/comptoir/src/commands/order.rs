//! # Client Order Commands
//!
//! A client order is a quote built from the cart. It never moves stock:
//! processing only marks it COMPLETED, the sale itself goes through
//! checkout.

use chrono::Utc;
use tracing::info;

use comptoir_core::ids::{prefixed_id, CLIENT_ORDER_PREFIX};
use comptoir_core::validation::validate_name;
use comptoir_core::{ClientOrder, CoreError, Entity, OrderStatus};
use comptoir_sync::RemoteBackend;

use crate::context::AppContext;
use crate::error::ApiResult;

/// Saves the cart as a PENDING order for `customer_name` and empties the cart.
pub async fn create_client_order<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    customer_name: &str,
) -> ApiResult<ClientOrder> {
    validate_name("customer name", customer_name)?;
    let company = ctx.active_company()?.clone();
    if ctx.cart().is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let totals = ctx.cart().totals(company.tax_rate());
    let mut order = ClientOrder {
        id: prefixed_id(CLIENT_ORDER_PREFIX),
        company_id: String::new(),
        customer_name: customer_name.trim().to_string(),
        date: Utc::now(),
        items: ctx.cart().items.clone(),
        total: totals.total.minor(),
        status: OrderStatus::Pending,
    };
    order.assign_company(&company.id);

    let order = ctx.persist(&order).await?;
    ctx.cart_mut().clear();

    info!(order_id = %order.id, total = order.total, "Client order created");
    Ok(order)
}

/// PENDING → COMPLETED.
pub async fn process_client_order<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    id: &str,
) -> ApiResult<ClientOrder> {
    move_order(ctx, id, OrderStatus::Completed).await
}

/// PENDING → CANCELLED.
pub async fn cancel_client_order<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    id: &str,
) -> ApiResult<ClientOrder> {
    move_order(ctx, id, OrderStatus::Cancelled).await
}

pub async fn delete_client_order<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    id: &str,
) -> ApiResult<()> {
    ctx.session().require_tenant()?;
    let order = ctx.scoped_record::<ClientOrder>(id)?;
    ctx.discard::<ClientOrder>(&order.id).await?;
    Ok(())
}

async fn move_order<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    id: &str,
    next: OrderStatus,
) -> ApiResult<ClientOrder> {
    ctx.session().require_tenant()?;
    let mut order = ctx.scoped_record::<ClientOrder>(id)?;
    order.transition(next)?;
    let order = ctx.persist(&order).await?;
    info!(order_id = %order.id, status = ?order.status, "Client order updated");
    Ok(order)
}
