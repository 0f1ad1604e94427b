//! # Pricing
//!
//! Discounted line totals. The checkout engine and the console cart both use
//! these, so the total shown before checkout matches the one recorded.
//!
//! ```text
//! line total  = sell_price × (1 − discount/100) × quantity
//! grand total = Σ line totals            (no intermediate rounding)
//! ```
//!
//! Both are checked: an amount a decimal cannot hold is a
//! [`ValidationError::Overflow`], never a panic.

use crate::error::ValidationError;
use crate::money::{DiscountRate, Money};
use crate::validation::ValidationResult;

/// Total for one line after discount, unrounded.
pub fn line_total(sell_price: Money, discount: DiscountRate, quantity: i64) -> ValidationResult<Money> {
    sell_price
        .checked_apply_discount(discount)
        .and_then(|unit| unit.checked_mul(quantity))
        .ok_or_else(|| overflow("line_total"))
}

/// Sum of line totals.
pub fn grand_total<I>(lines: I) -> ValidationResult<Money>
where
    I: IntoIterator<Item = Money>,
{
    lines
        .into_iter()
        .try_fold(Money::zero(), |acc, line| acc.checked_add(line))
        .ok_or_else(|| overflow("total"))
}

fn overflow(field: &str) -> ValidationError {
    ValidationError::Overflow {
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_total_with_discount() {
        let total = line_total(Money::from_cents(1000), DiscountRate::from_percent(10), 2).unwrap();
        assert_eq!(total, Money::from_cents(1800));
    }

    #[test]
    fn test_line_total_without_discount() {
        let total = line_total(Money::from_cents(250), DiscountRate::none(), 3).unwrap();
        assert_eq!(total, Money::from_cents(750));
    }

    #[test]
    fn test_grand_total_rounds_only_once() {
        // 0.005 per line; rounding each line first would give $0.03
        let line = line_total(Money::from_cents(1), DiscountRate::from_percent(50), 1).unwrap();
        let total = grand_total([line, line, line]).unwrap();

        assert_eq!(total.as_decimal(), dec!(0.015));
        assert_eq!(total.to_string(), "$0.02");
    }

    #[test]
    fn test_grand_total_of_nothing_is_zero() {
        assert!(grand_total(Vec::new()).unwrap().is_zero());
    }

    #[test]
    fn test_huge_line_is_overflow_error() {
        let price = Money::from_decimal(dec!(70000000000000000000000000000));

        let err = line_total(price, DiscountRate::none(), 2).unwrap_err();
        assert!(matches!(err, ValidationError::Overflow { ref field } if field == "line_total"));
    }

    #[test]
    fn test_huge_sum_is_overflow_error() {
        let line = Money::from_decimal(Decimal::MAX);

        let err = grand_total([line, Money::from_cents(100)]).unwrap_err();
        assert!(matches!(err, ValidationError::Overflow { ref field } if field == "total"));
    }
}
