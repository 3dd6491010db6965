//! # Validation Module
//!
//! Checks run by the mutation handlers before a record is handed to the
//! sync gateway. The store itself accepts any well-formed JSON, so anything
//! not caught here is persisted as-is.
//!
//! ## Usage
//! ```rust
//! use comptoir_core::validation::{validate_name, validate_quantity};
//!
//! validate_name("name", "Robe Soirée Satin").unwrap();
//! validate_quantity(2).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::Product;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MIN_SECRET_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (product, client, supplier, company...).
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a login name: non-blank, no whitespace, at most 50 characters.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    validate_name("username", username)?;

    if username.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates a settings PIN.
///
/// ## Rules
/// - Digits only
/// - At least [`MIN_SECRET_LENGTH`] digits
pub fn validate_settings_pin(pin: &str) -> ValidationResult<()> {
    if pin.chars().count() < MIN_SECRET_LENGTH {
        return Err(ValidationError::TooShort {
            field: "settings PIN".to_string(),
            min: MIN_SECRET_LENGTH,
        });
    }

    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "settings PIN".to_string(),
            reason: "must contain digits only".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity: 1 to [`MAX_ITEM_QUANTITY`].
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an amount. Zero is allowed (free items, services).
pub fn validate_amount(field: &str, amount: i64) -> ValidationResult<()> {
    if amount < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level. Stock never goes below zero.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    validate_amount("stock", stock)
}

/// Validates a whole-percent discount (0-100).
pub fn validate_discount(percent: u32) -> ValidationResult<()> {
    if percent > 100 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates cart size before adding a new line.
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a product as a whole, including the pricing override rule.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_name("name", &product.name)?;
    validate_amount("price", product.price)?;
    if let Some(cost) = product.purchase_cost {
        validate_amount("purchase cost", cost)?;
    }
    validate_stock(product.stock)?;
    validate_discount(product.discount)?;
    validate_amount("promotional price", product.promotional_price)?;
    product.check_pricing()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Parfum \"Essence d'Or\"").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"é".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("vente_tech").is_ok());
        assert!(validate_username("vente tech").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_validate_settings_pin() {
        assert!(validate_settings_pin("1234").is_ok());
        assert!(validate_settings_pin("000000").is_ok());
        assert!(validate_settings_pin("123").is_err());
        assert!(validate_settings_pin("12a4").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_discount_and_tax() {
        assert!(validate_discount(100).is_ok());
        assert!(validate_discount(101).is_err());
        assert!(validate_tax_rate_bps(1800).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_product_rejects_pricing_conflict() {
        let mut product = Product {
            id: "p".to_string(),
            company_id: "1".to_string(),
            name: "Robe".to_string(),
            category: Category::Fashion,
            price: 45_000,
            purchase_cost: Some(20_000),
            stock: 8,
            description: String::new(),
            image: None,
            discount: 10,
            promotional_price: 500,
        };
        assert!(matches!(
            validate_product(&product),
            Err(ValidationError::PricingConflict { .. })
        ));

        product.promotional_price = 0;
        assert!(validate_product(&product).is_ok());

        product.stock = -1;
        assert!(validate_product(&product).is_err());
    }
}
