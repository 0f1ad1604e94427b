//! # Cart State
//!
//! The console's local cart. It is never persisted; the store only learns
//! about it when a checkout is posted.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Event / Command          Method                  Cart State Change     │
//! │  ───────────────          ──────                  ─────────────────     │
//! │                                                                         │
//! │  Priced scan ────────────► add(product, 1) ─────► push or qty += 1     │
//! │                                                                         │
//! │  `remove <code>` ────────► remove(code) ────────► lines.remove(i)      │
//! │                                                                         │
//! │  `clear` ────────────────► clear() ─────────────► lines.clear()        │
//! │                                                                         │
//! │  `checkout` ─────────────► checkout_items() ────► (read only)          │
//! │        success ──────────► clear()                                      │
//! │        failure ──────────► cart left intact                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use grocer_core::pricing::{grand_total, line_total};
use grocer_core::{CheckoutItem, DiscountRate, Money, Product, MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Quantity would exceed maximum of {0}")]
    QuantityLimit(i64),

    #[error("Cart cannot have more than {0} items")]
    Full(usize),

    #[error("{0} is not in the cart")]
    NotInCart(String),

    #[error("Cart total would be too large")]
    TotalTooLarge,
}

/// A cart line. Price and discount are frozen when the product is added.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub barcode: String,
    pub name: String,
    pub unit_price: Money,
    pub discount: DiscountRate,
    pub quantity: i64,
    subtotal: Money,
}

impl CartLine {
    fn priced(product: &Product, quantity: i64) -> Result<Self, CartError> {
        Ok(CartLine {
            barcode: product.barcode.clone(),
            name: product.name.clone(),
            unit_price: product.sell_price,
            discount: product.discount,
            quantity,
            subtotal: line_total(product.sell_price, product.discount, quantity)
                .map_err(|_| CartError::TotalTooLarge)?,
        })
    }

    /// Discounted, unrounded line total.
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }
}

/// Ordered lines, unique by barcode.
///
/// Line subtotals and the cart total are computed when a line changes, so
/// an amount too large to hold is refused at `add` instead of surfacing
/// later.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    total: Money,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product, merging into an existing line with the same barcode.
    pub fn add(&mut self, product: &Product, quantity: i64) -> Result<(), CartError> {
        let existing = self.lines.iter().position(|l| l.barcode == product.barcode);

        let line = match existing {
            Some(i) => {
                let current = &self.lines[i];
                let new_qty = current.quantity + quantity;
                if new_qty > MAX_ITEM_QUANTITY {
                    return Err(CartError::QuantityLimit(MAX_ITEM_QUANTITY));
                }
                // Keep the frozen price, only the quantity moves
                let mut merged = current.clone();
                merged.quantity = new_qty;
                merged.subtotal = line_total(merged.unit_price, merged.discount, new_qty)
                    .map_err(|_| CartError::TotalTooLarge)?;
                merged
            }
            None => {
                if self.lines.len() >= MAX_CART_ITEMS {
                    return Err(CartError::Full(MAX_CART_ITEMS));
                }
                if quantity > MAX_ITEM_QUANTITY {
                    return Err(CartError::QuantityLimit(MAX_ITEM_QUANTITY));
                }
                CartLine::priced(product, quantity)?
            }
        };

        let others = self
            .lines
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != existing)
            .map(|(_, l)| l.subtotal);
        self.total = grand_total(others.chain([line.subtotal]))
            .map_err(|_| CartError::TotalTooLarge)?;

        match existing {
            Some(i) => self.lines[i] = line,
            None => self.lines.push(line),
        }
        Ok(())
    }

    /// Removes the whole line for `barcode`.
    pub fn remove(&mut self, barcode: &str) -> Result<CartLine, CartError> {
        let index = self
            .lines
            .iter()
            .position(|l| l.barcode == barcode)
            .ok_or_else(|| CartError::NotInCart(barcode.to_string()))?;
        let line = self.lines.remove(index);
        self.total = self.total - line.subtotal;
        Ok(line)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = Money::zero();
    }

    pub fn contains(&self, barcode: &str) -> bool {
        self.lines.iter().any(|l| l.barcode == barcode)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of unrounded line subtotals. Matches what the store will charge
    /// as long as prices did not change since the lines were added.
    pub fn total(&self) -> Money {
        self.total
    }

    /// The checkout request body, in cart order.
    pub fn checkout_items(&self) -> Vec<CheckoutItem> {
        self.lines
            .iter()
            .map(|l| CheckoutItem {
                barcode: l.barcode.clone(),
                quantity: l.quantity,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::product;
    use std::str::FromStr;

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        cart.add(&product("5012345678900", 1000, 10), 2).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.total(), Money::from_cents(1800));
    }

    #[test]
    fn test_cart_add_same_product_increases_quantity() {
        let mut cart = Cart::new();
        let milk = product("5012345678900", 250, 0);

        cart.add(&milk, 1).unwrap();
        cart.add(&milk, 1).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total(), Money::from_cents(500));
    }

    #[test]
    fn test_cart_freezes_price() {
        let mut cart = Cart::new();
        let mut milk = product("5012345678900", 250, 0);
        cart.add(&milk, 1).unwrap();

        milk.sell_price = Money::from_cents(999);
        cart.add(&milk, 1).unwrap();

        assert_eq!(cart.lines()[0].unit_price, Money::from_cents(250));
    }

    #[test]
    fn test_cart_quantity_limit() {
        let mut cart = Cart::new();
        let milk = product("5012345678900", 250, 0);
        cart.add(&milk, MAX_ITEM_QUANTITY).unwrap();

        assert_eq!(
            cart.add(&milk, 1),
            Err(CartError::QuantityLimit(MAX_ITEM_QUANTITY))
        );
        assert_eq!(cart.lines()[0].quantity, MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_cart_line_limit() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_ITEMS {
            cart.add(&product(&format!("code-{i}"), 100, 0), 1).unwrap();
        }

        assert_eq!(
            cart.add(&product("one-too-many", 100, 0), 1),
            Err(CartError::Full(MAX_CART_ITEMS))
        );
    }

    #[test]
    fn test_cart_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(&product("a", 100, 0), 1).unwrap();
        cart.add(&product("b", 200, 0), 3).unwrap();

        let removed = cart.remove("a").unwrap();
        assert_eq!(removed.barcode, "a");
        assert!(!cart.contains("a"));
        assert_eq!(cart.remove("a"), Err(CartError::NotInCart("a".to_string())));

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.total().is_zero());
    }

    #[test]
    fn test_cart_refuses_total_it_cannot_hold() {
        let mut cart = Cart::new();
        let mut huge = product("huge", 0, 0);
        huge.sell_price = Money::from_str("70000000000000000000000000000").unwrap();

        cart.add(&huge, 1).unwrap();
        assert_eq!(cart.add(&huge, 1), Err(CartError::TotalTooLarge));
        assert_eq!(cart.lines()[0].quantity, 1);

        let mut other = product("other", 0, 0);
        other.sell_price = huge.sell_price;
        assert_eq!(cart.add(&other, 1), Err(CartError::TotalTooLarge));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), huge.sell_price);
    }

    #[test]
    fn test_checkout_items_keep_order() {
        let mut cart = Cart::new();
        cart.add(&product("b", 100, 0), 2).unwrap();
        cart.add(&product("a", 100, 0), 1).unwrap();

        let items = cart.checkout_items();
        assert_eq!(items[0].barcode, "b");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].barcode, "a");
    }
}
