//! # Money Module
//!
//! `Money` holds an amount in the currency's smallest unit. FCFA has no
//! minor unit, so for the seeded tenants one unit is one franc.
//!
//! ## Usage
//! ```rust
//! use comptoir_core::money::Money;
//! use comptoir_core::types::TaxRate;
//!
//! let line = Money::from_minor(1000).multiply_quantity(2);
//! let tax = line.calculate_tax(TaxRate::from_bps(1800));
//! assert_eq!((line + tax).minor(), 2360);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// A monetary amount in the smallest currency unit.
///
/// Signed so that refunds and corrections can be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    #[inline]
    pub const fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the raw amount in the smallest currency unit.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax with half-up rounding.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`, widened to i128 so large
    /// totals cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use comptoir_core::money::Money;
    /// use comptoir_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_minor(2000);
    /// assert_eq!(subtotal.calculate_tax(TaxRate::from_bps(1800)).minor(), 360);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money(tax as i64)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a whole-percent discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use comptoir_core::money::Money;
    ///
    /// let price = Money::from_minor(450_000);
    /// assert_eq!(price.apply_percentage_discount(5).minor(), 427_500);
    /// ```
    pub fn apply_percentage_discount(&self, percent: u32) -> Money {
        let off = (self.0 as i128 * percent as i128 * 100 + 5000) / 10000;
        Money(self.0 - off as i64)
    }

    /// Formats the amount with thousands grouping and a currency symbol,
    /// the way receipts print it: `2 360 FCFA`.
    pub fn format_with(&self, currency_symbol: &str) -> String {
        format!("{} {}", self, currency_symbol)
    }
}

/// Groups digits by thousands with a space separator.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }
        if self.0 < 0 {
            write!(f, "-{}", grouped)
        } else {
            write!(f, "{}", grouped)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_minor(2360).to_string(), "2 360");
        assert_eq!(Money::from_minor(450_000).to_string(), "450 000");
        assert_eq!(Money::from_minor(999).to_string(), "999");
        assert_eq!(Money::from_minor(-15_000).to_string(), "-15 000");
        assert_eq!(Money::from_minor(0).format_with("FCFA"), "0 FCFA");
    }

    #[test]
    fn test_tax_eighteen_percent() {
        let tax = Money::from_minor(2000).calculate_tax(TaxRate::from_bps(1800));
        assert_eq!(tax.minor(), 360);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 5 × 10% = 0.5 → 1
        let tax = Money::from_minor(5).calculate_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.minor(), 1);
    }

    #[test]
    fn test_percentage_discount() {
        assert_eq!(Money::from_minor(35_000).apply_percentage_discount(10).minor(), 31_500);
        assert_eq!(Money::from_minor(1000).apply_percentage_discount(0).minor(), 1000);
        assert_eq!(Money::from_minor(1000).apply_percentage_discount(100).minor(), 0);
    }

    #[test]
    fn test_sum_and_arithmetic() {
        let total: Money = [100, 250, 650].into_iter().map(Money::from_minor).sum();
        assert_eq!(total.minor(), 1000);
        assert_eq!((total - Money::from_minor(400)).minor(), 600);
        assert_eq!((Money::from_minor(299) * 3).minor(), 897);
    }
}
