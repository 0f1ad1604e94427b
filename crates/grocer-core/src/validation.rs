//! # Validation Module
//!
//! Input validation for everything that reaches the catalog or the checkout.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Operator console                                             │
//! │  └── Pricing form rejects sell price <= 0 before any request           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler                                                 │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── UNIQUE(barcode)                                                   │
//! │  └── CHECK(stock >= 0)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use grocer_core::validation::{validate_barcode, validate_quantity};
//!
//! assert_eq!(validate_barcode(" 5012345678900 ").unwrap(), "5012345678900");
//! assert!(validate_quantity(0).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::{DiscountRate, Money};
use crate::types::CheckoutItem;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted barcode, in characters.
pub const MAX_BARCODE_LEN: usize = 64;

/// Longest accepted product name, in characters.
pub const MAX_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a barcode and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 64 characters
/// - No whitespace or control characters inside
///
/// Any symbology is accepted; no check digit is verified.
pub fn validate_barcode(barcode: &str) -> ValidationResult<String> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::required("barcode"));
    }

    if barcode.chars().count() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }

    if barcode
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(barcode.to_string())
}

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use grocer_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Oat Milk 1L").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stored price. Zero is allowed; a zero sell price marks a
/// product that still needs pricing.
///
/// ## Rules
/// - Must not be negative
/// - At most MAX_PRICE (1,000,000)
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if price.as_decimal() > Decimal::from(MAX_PRICE) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE,
        });
    }

    Ok(())
}

/// Validates the sell price entered when pricing a product for sale.
pub fn validate_sell_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "sell_price".to_string(),
        });
    }
    validate_price("sell_price", price)
}

/// Validates a discount percentage (0 to 100 inclusive).
pub fn validate_discount(discount: DiscountRate) -> ValidationResult<()> {
    let pct = discount.percent();
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates an on-hand stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

/// Validates a checkout or cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
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

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates the shape of a checkout request before touching the store.
///
/// The same barcode may appear on more than one line; each line is applied
/// in order against the stock left by the previous ones.
pub fn validate_checkout_items(items: &[CheckoutItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::required("items"));
    }

    if items.len() > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    for item in items {
        validate_barcode(&item.barcode)?;
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(barcode: &str, quantity: i64) -> CheckoutItem {
        CheckoutItem {
            barcode: barcode.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_barcode_validation() {
        assert_eq!(validate_barcode("5012345678900").unwrap(), "5012345678900");
        assert!(matches!(
            validate_barcode("  "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_barcode("501 234"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_barcode(&"9".repeat(65)),
            Err(ValidationError::TooLong { max: 64, .. })
        ));
    }

    #[test]
    fn test_name_validation() {
        assert!(validate_product_name("Item 56789").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"n".repeat(201)).is_err());
    }

    #[test]
    fn test_price_validation() {
        assert!(validate_price("buy_price", Money::zero()).is_ok());
        assert!(validate_price("buy_price", Money::from_cents(-1)).is_err());
        assert!(validate_sell_price(Money::zero()).is_err());
        assert!(validate_sell_price(Money::from_cents(1)).is_ok());
    }

    #[test]
    fn test_price_upper_bound() {
        let cap = Money::from_cents(MAX_PRICE * 100);
        assert!(validate_price("sell_price", cap).is_ok());
        assert!(validate_sell_price(cap).is_ok());

        let over = Money::from_decimal(dec!(1000000.01));
        assert!(matches!(
            validate_price("sell_price", over),
            Err(ValidationError::OutOfRange { max: MAX_PRICE, .. })
        ));
        assert!(validate_sell_price(over).is_err());
        assert!(validate_price(
            "buy_price",
            Money::from_decimal(dec!(70000000000000000000000000000))
        )
        .is_err());
    }

    #[test]
    fn test_discount_validation() {
        assert!(validate_discount(DiscountRate::from_percent(0)).is_ok());
        assert!(validate_discount(DiscountRate::from_percent(100)).is_ok());
        assert!(validate_discount(DiscountRate::from_decimal(dec!(100.01))).is_err());
        assert!(validate_discount(DiscountRate::from_decimal(dec!(-1))).is_err());
    }

    #[test]
    fn test_quantity_and_stock_validation() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_checkout_items_validation() {
        assert!(validate_checkout_items(&[item("5012345678900", 2)]).is_ok());
        assert!(matches!(
            validate_checkout_items(&[]),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_checkout_items(&[item("5012345678900", 0)]).is_err());
        assert!(validate_checkout_items(&[item("", 1)]).is_err());

        let too_many: Vec<_> = (0..101).map(|i| item(&format!("C{i}"), 1)).collect();
        assert!(validate_checkout_items(&too_many).is_err());
    }
}
