//! # State Module
//!
//! Everything the console remembers between events. None of it is shared
//! across tasks: the UI loop owns a single [`ConsoleState`] and the poller
//! only talks to it through channels.

mod cart;
mod machine;

pub use cart::{Cart, CartError, CartLine};
pub use machine::{ConsoleState, FormField, FormStep, Mode, PricingForm, ScanOutcome};

#[cfg(test)]
pub(crate) mod fixtures {
    use grocer_core::{DiscountRate, Money, Product};

    pub(crate) fn product(barcode: &str, cents: i64, discount: u32) -> Product {
        let mut product: Product = serde_json::from_value(serde_json::json!({
            "id": 1,
            "barcode": barcode,
            "product_type": "General",
            "manufacturer_code": "2345",
            "product_code": "67890",
            "name": format!("Item {barcode}"),
            "buy_price": 1.0,
            "sell_price": 0.0,
            "discount": 0,
            "stock": 10,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        product.sell_price = Money::from_cents(cents);
        product.discount = DiscountRate::from_percent(discount);
        product
    }
}
