//! # Cart State
//!
//! The cart being built at the point of sale.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Action                Handler                 Cart Change           │
//! │  ─────────                ───────                 ───────────           │
//! │                                                                         │
//! │  Click Product ──────────► add_to_cart() ───────► line added / +qty    │
//! │                                                                         │
//! │  Change Quantity ────────► update_cart_item() ──► line.qty = n         │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► line removed         │
//! │                                                                         │
//! │  Pick Client ────────────► attach_client() ─────► client_id set        │
//! │                                                                         │
//! │  Checkout / Save Order ──► checkout() ──────────► cleared              │
//! │                                                                         │
//! │  Every quantity is checked against the product's current stock.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use comptoir_core::validation::{validate_cart_size, validate_quantity};
use comptoir_core::{CartItem, CartTotals, CoreError, CoreResult, Product, TaxRate, MAX_CART_ITEMS};

/// The cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product increases quantity)
/// - Quantity is between 1 and `MAX_ITEM_QUANTITY` and never above stock
/// - At most `MAX_CART_ITEMS` lines
/// - Lines hold a pricing snapshot taken when the product was first added
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,

    /// Client the sale will be credited to.
    pub client_id: Option<String>,

    /// When this cart was created/last cleared
    pub created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            client_id: None,
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart or increases quantity if already present.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = item.quantity + quantity;
            validate_quantity(new_qty)?;
            product.ensure_stock(new_qty)?;
            item.quantity = new_qty;
            return Ok(());
        }

        if validate_cart_size(self.items.len()).is_err() {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }

        product.ensure_stock(quantity)?;
        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of a line. Zero removes it.
    pub fn update_quantity(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(&product.id);
        }

        validate_quantity(quantity)?;
        product.ensure_stock(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product.id)
            .ok_or_else(|| CoreError::not_found("Cart line", &product.id))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::not_found("Cart line", product_id))
        } else {
            Ok(())
        }
    }

    pub fn attach_client(&mut self, client_id: Option<String>) {
        self.client_id = client_id;
    }

    /// Clears lines and client.
    pub fn clear(&mut self) {
        self.items.clear();
        self.client_id = None;
        self.created_at = Utc::now();
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn totals(&self, tax_rate: TaxRate) -> CartTotals {
        CartTotals::compute(&self.items, tax_rate)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart summary for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub client_id: Option<String>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub totals: CartTotals,
}

impl CartView {
    pub fn new(cart: &Cart, tax_rate: TaxRate) -> Self {
        CartView {
            items: cart.items.clone(),
            client_id: cart.client_id.clone(),
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            totals: cart.totals(tax_rate),
        }
    }
}
