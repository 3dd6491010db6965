//! # Cart Commands
//!
//! Lines are built from products of the active company only, and priced
//! with the active company's tax rate.

use tracing::debug;

use comptoir_core::{Client, Product};
use comptoir_sync::RemoteBackend;

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::state::CartView;

pub async fn get_cart<R: RemoteBackend>(ctx: &AppContext<R>) -> ApiResult<CartView> {
    let tax_rate = ctx.active_company()?.tax_rate();
    Ok(CartView::new(ctx.cart(), tax_rate))
}

pub async fn add_to_cart<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    product_id: &str,
    quantity: i64,
) -> ApiResult<CartView> {
    debug!(product_id = %product_id, quantity, "add_to_cart");
    let product = ctx.scoped_record::<Product>(product_id)?;
    ctx.cart_mut().add_item(&product, quantity)?;
    get_cart(ctx).await
}

/// Sets a line's quantity; zero removes the line.
pub async fn update_cart_item<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    product_id: &str,
    quantity: i64,
) -> ApiResult<CartView> {
    let product = ctx.scoped_record::<Product>(product_id)?;
    ctx.cart_mut().update_quantity(&product, quantity)?;
    get_cart(ctx).await
}

pub async fn remove_from_cart<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    product_id: &str,
) -> ApiResult<CartView> {
    ctx.cart_mut().remove_item(product_id)?;
    get_cart(ctx).await
}

/// Credits the coming sale to a client of the active company, or to nobody.
pub async fn attach_client<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    client_id: Option<&str>,
) -> ApiResult<CartView> {
    let client_id = match client_id {
        Some(id) => Some(ctx.scoped_record::<Client>(id)?.id),
        None => None,
    };
    ctx.cart_mut().attach_client(client_id);
    get_cart(ctx).await
}

pub async fn clear_cart<R: RemoteBackend>(ctx: &mut AppContext<R>) {
    ctx.cart_mut().clear();
}
