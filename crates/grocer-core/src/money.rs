//! # Money Module
//!
//! `Money` and `DiscountRate`, both backed by exact decimals.
//!
//! ## Rounding Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ACCUMULATE EXACT, ROUND ON DISPLAY                                     │
//! │                                                                         │
//! │  sell 3.33, discount 15%  →  effective 2.8305                          │
//! │  × 3                      →  line total 8.4915   (stored as-is)        │
//! │  Σ lines                  →  grand total 8.4915  (stored as-is)        │
//! │  Display / receipt        →  "$8.49"             (rounded here only)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On the JSON wire both types are plain numbers (`10.5`, not `"10.50"`), so
//! any HTTP client can post prices without knowing about decimals.
//!
//! ## Usage
//! ```rust
//! use grocer_core::money::{DiscountRate, Money};
//!
//! let price = Money::from_cents(1000);              // $10.00
//! let unit = price.apply_discount(DiscountRate::from_percent(10));
//! assert_eq!(unit * 2, Money::from_cents(1800));
//! assert_eq!(format!("{}", unit), "$9.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the store's single currency.
///
/// ## Where Money is Used
/// ```text
/// Product.sell_price ──► apply_discount ──► × quantity ──► line total
///                                                              │
///                                    Σ line totals ◄───────────┘
///                                          │
///                                          ▼
///                              receipt payload "Payment: $18.00|..."
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use grocer_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    #[inline]
    pub const fn from_decimal(value: Decimal) -> Self {
        Money(value)
    }

    /// The exact, unrounded value.
    #[inline]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Value rounded half away from zero to 2 places.
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Price after a percentage discount: `self × (1 − rate/100)`.
    ///
    /// Not rounded; the result keeps full precision for accumulation.
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        Money(self.0 * rate.multiplier())
    }

    /// `self + rhs`, or `None` if the result cannot be represented.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// `self × qty`, or `None` if the result cannot be represented.
    pub fn checked_mul(self, qty: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Like [`Money::apply_discount`], but `None` instead of a panic when
    /// the rate is far outside 0..=100.
    pub fn checked_apply_discount(self, rate: DiscountRate) -> Option<Money> {
        rate.checked_multiplier()
            .and_then(|m| self.0.checked_mul(m))
            .map(Money)
    }

    /// Canonical text form used by the store (`"10.5"`, `"0"`).
    pub fn to_storage_string(&self) -> String {
        self.0.normalize().to_string()
    }
}

/// Shows money as `$12.34`, rounded to cents.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            write!(f, "-${:.2}", rounded.abs())
        } else {
            write!(f, "${:.2}", rounded.abs())
        }
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

/// Money × quantity.
impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, qty: i64) -> Money {
        Money(self.0 * Decimal::from(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// A percentage discount between 0 and 100 inclusive.
///
/// Range is enforced by [`crate::validation::validate_discount`], not by the
/// constructor, so values read back from the wire can be reported as
/// validation errors rather than panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct DiscountRate(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl DiscountRate {
    pub fn from_percent(percent: u32) -> Self {
        DiscountRate(Decimal::from(percent))
    }

    pub const fn from_decimal(percent: Decimal) -> Self {
        DiscountRate(percent)
    }

    pub const fn none() -> Self {
        DiscountRate(Decimal::ZERO)
    }

    /// The percentage value, e.g. `10` for 10%.
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `1 − percent/100`
    pub fn multiplier(&self) -> Decimal {
        Decimal::ONE - self.0 / Decimal::ONE_HUNDRED
    }

    fn checked_multiplier(&self) -> Option<Decimal> {
        self.0
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|fraction| Decimal::ONE.checked_sub(fraction))
    }

    pub fn to_storage_string(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl FromStr for DiscountRate {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim().trim_end_matches('%')).map(DiscountRate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_decimal(dec!(8.4915)).to_string(), "$8.49");
        assert_eq!(Money::from_decimal(dec!(0.005)).to_string(), "$0.01");
        assert_eq!(Money::from_decimal(dec!(-5.5)).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_discount_keeps_precision() {
        let unit = Money::from_decimal(dec!(3.33)).apply_discount(DiscountRate::from_percent(15));
        assert_eq!(unit.as_decimal(), dec!(2.8305));
        assert_eq!((unit * 3).as_decimal(), dec!(8.4915));
    }

    #[test]
    fn test_full_discount_is_free() {
        let unit = Money::from_cents(250).apply_discount(DiscountRate::from_percent(100));
        assert!(unit.is_zero());
    }

    #[test]
    fn test_sum() {
        let lines = vec![Money::from_cents(1800), Money::from_decimal(dec!(0.333))];
        let total: Money = lines.iter().sum();
        assert_eq!(total.as_decimal(), dec!(18.333));
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let huge = Money::from_decimal(Decimal::MAX);
        assert_eq!(huge.checked_mul(2), None);
        assert_eq!(huge.checked_add(Money::from_cents(1_000_000)), None);
        assert_eq!(
            Money::from_cents(1000).checked_mul(3),
            Some(Money::from_cents(3000))
        );
        assert_eq!(
            Money::from_cents(1000).checked_apply_discount(DiscountRate::from_percent(10)),
            Some(Money::from_cents(900))
        );
        assert_eq!(
            huge.checked_apply_discount(DiscountRate::from_decimal(dec!(-100))),
            None
        );
    }

    #[test]
    fn test_equality_ignores_scale() {
        assert_eq!(Money::from_decimal(dec!(18.000)), Money::from_cents(1800));
    }

    #[test]
    fn test_storage_string_parses_back() {
        let price = Money::from_decimal(dec!(10.50));
        assert_eq!(price.to_storage_string(), "10.5");
        assert_eq!(Money::from_str("10.5").ok(), Some(price));
        assert!(Money::from_str("ten").is_err());
    }

    #[test]
    fn test_json_uses_plain_numbers() {
        let json = serde_json::to_string(&Money::from_cents(1050)).unwrap();
        assert_eq!(json, "10.5");

        let rate: DiscountRate = serde_json::from_str("12.5").unwrap();
        assert_eq!(rate.percent(), dec!(12.5));
    }

    #[test]
    fn test_discount_rate_parse_and_display() {
        let rate = DiscountRate::from_str("10%").unwrap();
        assert_eq!(rate, DiscountRate::from_percent(10));
        assert_eq!(rate.to_string(), "10%");
        assert_eq!(rate.multiplier(), dec!(0.9));
    }
}
