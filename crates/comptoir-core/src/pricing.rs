//! # Pricing Rules
//!
//! A product may carry either a whole-percent `discount` or a fixed
//! `promotional_price`, never both. When both are set the record is
//! ambiguous and must be resolved by an explicit [`PricingChoice`] before
//! it is saved.
//!
//! ## Effective Unit Price
//! ```text
//! promotional_price > 0  ──► promotional_price
//! discount > 0           ──► price × (1 − discount / 100)
//! otherwise              ──► price
//! ```
//!
//! ## Cart Total
//! ```text
//! subtotal = Σ effective_unit_price × quantity
//! tax      = subtotal × company tax rate
//! total    = subtotal + tax
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CartItem, Product, TaxRate};
use crate::LOYALTY_POINT_UNIT;

/// Which override to keep when a product has both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PricingChoice {
    /// Keep the percentage discount, clear the promotional price.
    KeepDiscount,
    /// Keep the promotional price, clear the percentage discount.
    KeepPromotion,
}

/// Unit price after applying whichever override is set.
pub fn effective_unit_price(price: i64, discount: u32, promotional_price: i64) -> Money {
    if promotional_price > 0 {
        Money::from_minor(promotional_price)
    } else if discount > 0 {
        Money::from_minor(price).apply_percentage_discount(discount)
    } else {
        Money::from_minor(price)
    }
}

/// Clears the override not chosen.
pub fn resolve(discount: &mut u32, promotional_price: &mut i64, choice: PricingChoice) {
    match choice {
        PricingChoice::KeepDiscount => *promotional_price = 0,
        PricingChoice::KeepPromotion => *discount = 0,
    }
}

impl Product {
    pub fn has_pricing_conflict(&self) -> bool {
        self.discount > 0 && self.promotional_price > 0
    }

    /// Fails when both overrides are set.
    pub fn check_pricing(&self) -> Result<(), ValidationError> {
        if self.has_pricing_conflict() {
            return Err(ValidationError::PricingConflict {
                product: self.name.clone(),
                discount: self.discount,
                promotional_price: self.promotional_price,
            });
        }
        Ok(())
    }

    pub fn resolve_pricing(&mut self, choice: PricingChoice) {
        resolve(&mut self.discount, &mut self.promotional_price, choice);
    }

    pub fn effective_price(&self) -> Money {
        effective_unit_price(self.price, self.discount, self.promotional_price)
    }
}

impl CartItem {
    pub fn effective_unit_price(&self) -> Money {
        effective_unit_price(self.unit_price, self.discount, self.promotional_price)
    }

    pub fn line_total(&self) -> Money {
        self.effective_unit_price().multiply_quantity(self.quantity)
    }
}

/// Totals of a set of lines under one company's tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl CartTotals {
    pub fn compute(items: &[CartItem], tax_rate: TaxRate) -> Self {
        let subtotal: Money = items.iter().map(CartItem::line_total).sum();
        let tax = subtotal.calculate_tax(tax_rate);
        CartTotals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Loyalty points earned for a purchase: one per [`LOYALTY_POINT_UNIT`] spent,
/// rounded down.
pub fn loyalty_points_for(total: Money) -> i64 {
    if total.is_negative() {
        return 0;
    }
    total.minor() / LOYALTY_POINT_UNIT
}
