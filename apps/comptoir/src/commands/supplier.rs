//! # Supplier Commands
//!
//! Suppliers, purchase orders and goods receipt.
//!
//! ## Receiving Stock
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  receive_stock(supplier, lines, related order?)                         │
//! │                                                                         │
//! │  1. Related order (if any) must be PENDING: checked before any write    │
//! │  2. Every line's product must belong to the active company              │
//! │  3. Product stock += quantity, line by line                             │
//! │  4. SupplierInvoice INV-SUP-… with total Σ quantity × unit cost         │
//! │  5. Related order → RECEIVED                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use comptoir_core::ids::{new_id, prefixed_id, SUPPLIER_INVOICE_PREFIX, SUPPLIER_ORDER_PREFIX};
use comptoir_core::validation::{validate_amount, validate_name, validate_quantity};
use comptoir_core::{
    Entity, Product, Supplier, SupplierInvoice, SupplierInvoiceItem, SupplierOrder,
    SupplierOrderItem, SupplierOrderStatus,
};
use comptoir_sync::RemoteBackend;

use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInput {
    pub name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub supplied_product_ids: Vec<String>,
    pub next_delivery_date: Option<NaiveDate>,
}

/// One line of a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i64,
    pub estimated_unit_cost: i64,
}

/// One line of received goods.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub product_id: String,
    pub quantity: i64,
    pub unit_cost: i64,
}

// =============================================================================
// Suppliers
// =============================================================================

pub async fn create_supplier<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    input: SupplierInput,
) -> ApiResult<Supplier> {
    let company_id = ctx.session().require_tenant()?.to_string();
    validate_name("name", &input.name)?;

    let mut supplier = Supplier {
        id: new_id(),
        company_id: String::new(),
        name: input.name.trim().to_string(),
        contact_name: input.contact_name,
        email: input.email,
        phone: input.phone,
        address: input.address,
        supplied_product_ids: input.supplied_product_ids,
        last_order_date: None,
        next_delivery_date: input.next_delivery_date,
    };
    supplier.assign_company(&company_id);

    let supplier = ctx.persist(&supplier).await?;
    info!(supplier_id = %supplier.id, "Supplier created");
    Ok(supplier)
}

/// Replaces the editable fields. The last order date is kept.
pub async fn update_supplier<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    id: &str,
    input: SupplierInput,
) -> ApiResult<Supplier> {
    ctx.session().require_tenant()?;
    validate_name("name", &input.name)?;
    let mut supplier = ctx.scoped_record::<Supplier>(id)?;

    supplier.name = input.name.trim().to_string();
    supplier.contact_name = input.contact_name;
    supplier.email = input.email;
    supplier.phone = input.phone;
    supplier.address = input.address;
    supplier.supplied_product_ids = input.supplied_product_ids;
    supplier.next_delivery_date = input.next_delivery_date;

    ctx.persist(&supplier).await
}

pub async fn delete_supplier<R: RemoteBackend>(ctx: &mut AppContext<R>, id: &str) -> ApiResult<()> {
    ctx.session().require_tenant()?;
    let supplier = ctx.scoped_record::<Supplier>(id)?;
    ctx.discard::<Supplier>(&supplier.id).await?;
    Ok(())
}

// =============================================================================
// Purchase Orders
// =============================================================================

/// Creates a PENDING purchase order and stamps the supplier's last order date.
pub async fn create_supplier_order<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    supplier_id: &str,
    lines: Vec<OrderLine>,
    expected_delivery_date: Option<NaiveDate>,
) -> ApiResult<SupplierOrder> {
    let company_id = ctx.session().require_tenant()?.to_string();
    let mut supplier = ctx.scoped_record::<Supplier>(supplier_id)?;
    if lines.is_empty() {
        return Err(ApiError::validation("A purchase order needs at least one line"));
    }

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        validate_quantity(line.quantity)?;
        validate_amount("estimated unit cost", line.estimated_unit_cost)?;
        let product = ctx.scoped_record::<Product>(&line.product_id)?;
        items.push(SupplierOrderItem {
            product_id: product.id,
            product_name: product.name,
            quantity_ordered: line.quantity,
            estimated_unit_cost: line.estimated_unit_cost,
        });
    }

    let now = Utc::now();
    let mut order = SupplierOrder {
        id: prefixed_id(SUPPLIER_ORDER_PREFIX),
        company_id: String::new(),
        supplier_id: supplier.id.clone(),
        supplier_name: supplier.name.clone(),
        date: now,
        expected_delivery_date,
        total_estimated: items
            .iter()
            .map(|i| i.quantity_ordered * i.estimated_unit_cost)
            .sum(),
        items,
        status: SupplierOrderStatus::Pending,
    };
    order.assign_company(&company_id);

    let order = ctx.persist(&order).await?;

    supplier.last_order_date = Some(now.date_naive());
    if expected_delivery_date.is_some() {
        supplier.next_delivery_date = expected_delivery_date;
    }
    ctx.persist(&supplier).await?;

    info!(
        order_id = %order.id,
        supplier_id = %order.supplier_id,
        total_estimated = order.total_estimated,
        "Purchase order created"
    );
    Ok(order)
}

/// PENDING → CANCELLED.
pub async fn cancel_supplier_order<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    id: &str,
) -> ApiResult<SupplierOrder> {
    ctx.session().require_tenant()?;
    let mut order = ctx.scoped_record::<SupplierOrder>(id)?;
    order.transition(SupplierOrderStatus::Cancelled)?;
    let order = ctx.persist(&order).await?;
    info!(order_id = %order.id, "Purchase order cancelled");
    Ok(order)
}

// =============================================================================
// Goods Receipt
// =============================================================================

/// Adds received goods to stock and records the supplier invoice.
pub async fn receive_stock<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    supplier_id: &str,
    lines: Vec<ReceiptLine>,
    related_order_id: Option<&str>,
) -> ApiResult<SupplierInvoice> {
    let company_id = ctx.session().require_tenant()?.to_string();
    let supplier = ctx.scoped_record::<Supplier>(supplier_id)?;
    if lines.is_empty() {
        return Err(ApiError::validation("A receipt needs at least one line"));
    }

    let related_order = match related_order_id {
        Some(id) => {
            let mut order = ctx.scoped_record::<SupplierOrder>(id)?;
            order.transition(SupplierOrderStatus::Received)?;
            Some(order)
        }
        None => None,
    };

    // One record per product: repeated lines add up before anything is written.
    let mut received: Vec<Product> = Vec::new();
    let mut items = Vec::with_capacity(lines.len());
    for line in &lines {
        validate_quantity(line.quantity)?;
        validate_amount("unit cost", line.unit_cost)?;
        let index = match received.iter().position(|p| p.id == line.product_id) {
            Some(index) => index,
            None => {
                received.push(ctx.scoped_record::<Product>(&line.product_id)?);
                received.len() - 1
            }
        };
        let product = &mut received[index];
        product.stock += line.quantity;
        items.push(SupplierInvoiceItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity: line.quantity,
            unit_cost: line.unit_cost,
        });
    }

    for product in &received {
        debug!(product_id = %product.id, stock = product.stock, "Stock received");
        ctx.persist(product).await?;
    }

    let mut invoice = SupplierInvoice {
        id: prefixed_id(SUPPLIER_INVOICE_PREFIX),
        company_id: String::new(),
        supplier_id: supplier.id.clone(),
        supplier_name: supplier.name.clone(),
        date: Utc::now(),
        total_amount: items.iter().map(|i| i.quantity * i.unit_cost).sum(),
        items,
        related_order_id: related_order.as_ref().map(|o| o.id.clone()),
    };
    invoice.assign_company(&company_id);
    let invoice = ctx.persist(&invoice).await?;

    if let Some(order) = related_order {
        ctx.persist(&order).await?;
    }

    info!(
        invoice_id = %invoice.id,
        supplier_id = %supplier.id,
        total_amount = invoice.total_amount,
        "Stock received"
    );
    Ok(invoice)
}

pub async fn delete_supplier_invoice<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    id: &str,
) -> ApiResult<()> {
    ctx.session().require_tenant()?;
    let invoice = ctx.scoped_record::<SupplierInvoice>(id)?;
    ctx.discard::<SupplierInvoice>(&invoice.id).await?;
    Ok(())
}
