//! Plain-text tables for the terminal.

use std::fmt::Write;

use grocer_core::{CheckoutReceipt, Product, TransactionLine};

use crate::state::Cart;

pub fn format_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:<24} {:>9} {:>6} {:>4} {:>10}",
        "Barcode", "Name", "Price", "Disc", "Qty", "Subtotal"
    );
    for line in cart.lines() {
        let _ = writeln!(
            out,
            "{:<16} {:<24} {:>9} {:>6} {:>4} {:>10}",
            line.barcode,
            truncate(&line.name, 24),
            line.unit_price.to_string(),
            line.discount.to_string(),
            line.quantity,
            line.subtotal().to_string()
        );
    }
    let _ = write!(out, "Total: {}", cart.total());
    out
}

/// Products with stock below `low_stock` are marked and summarised.
pub fn format_inventory(products: &[Product], low_stock: i64) -> String {
    if products.is_empty() {
        return "No products registered".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5} {:<16} {:<24} {:>9} {:>9} {:>6} {:>6}",
        "Id", "Barcode", "Name", "Buy", "Sell", "Disc", "Stock"
    );
    for product in products {
        let flag = if product.is_low_stock(low_stock) { " !" } else { "" };
        let _ = writeln!(
            out,
            "{:>5} {:<16} {:<24} {:>9} {:>9} {:>6} {:>6}{}",
            product.id,
            product.barcode,
            truncate(&product.name, 24),
            product.buy_price.to_string(),
            product.sell_price.to_string(),
            product.discount.to_string(),
            product.stock,
            flag
        );
    }

    let low: Vec<&str> = products
        .iter()
        .filter(|p| p.is_low_stock(low_stock))
        .map(|p| p.name.as_str())
        .collect();
    if low.is_empty() {
        let _ = write!(out, "{} products", products.len());
    } else {
        let _ = write!(
            out,
            "{} products, low stock (< {}): {}",
            products.len(),
            low_stock,
            low.join(", ")
        );
    }
    out
}

pub fn format_history(lines: &[TransactionLine]) -> String {
    if lines.is_empty() {
        return "No transactions yet".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<19} {:<16} {:<24} {:>4} {:>10}  {}",
        "Time", "Barcode", "Name", "Qty", "Total", "Reference"
    );
    for line in lines {
        let _ = writeln!(
            out,
            "{:<19} {:<16} {:<24} {:>4} {:>10}  {}",
            line.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            line.barcode,
            truncate(&line.name, 24),
            line.quantity,
            line.total.to_string(),
            line.reference
        );
    }
    out.pop();
    out
}

pub fn format_receipt(receipt: &CheckoutReceipt) -> String {
    let mut out = String::new();
    for line in &receipt.lines {
        let _ = writeln!(
            out,
            "  {} x {:<24} {:>10}",
            line.quantity,
            truncate(&line.name, 24),
            line.line_total.to_string()
        );
    }
    let _ = writeln!(out, "Total: {}", receipt.total);
    let _ = write!(out, "Reference: {}", receipt.reference);
    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::product;

    #[test]
    fn test_cart_table() {
        let mut cart = Cart::new();
        assert_eq!(format_cart(&cart), "Cart is empty");

        cart.add(&product("5012345678900", 1000, 10), 2).unwrap();
        let table = format_cart(&cart);

        assert!(table.contains("5012345678900"));
        assert!(table.contains("$10.00"));
        assert!(table.contains("10%"));
        assert!(table.ends_with("Total: $18.00"));
    }

    #[test]
    fn test_inventory_flags_low_stock() {
        let mut low = product("111", 100, 0);
        low.stock = 2;
        low.name = "Bread".to_string();
        let plenty = product("222", 100, 0);

        let table = format_inventory(&[low, plenty], 5);

        assert!(table.contains("low stock (< 5): Bread"));
        assert_eq!(table.lines().filter(|l| l.ends_with(" !")).count(), 1);
        assert_eq!(format_inventory(&[], 5), "No products registered");
    }

    #[test]
    fn test_history_table() {
        let line: TransactionLine = serde_json::from_value(serde_json::json!({
            "id": 1,
            "barcode": "5012345678900",
            "name": "Oat Milk",
            "quantity": 2,
            "total": 18.0,
            "reference": "ref-1",
            "timestamp": "2026-03-01T09:30:00Z"
        }))
        .unwrap();

        let table = format_history(&[line]);
        assert!(table.contains("2026-03-01 09:30:00"));
        assert!(table.contains("$18.00"));
        assert!(table.ends_with("ref-1"));
        assert_eq!(format_history(&[]), "No transactions yet");
    }

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long product name", 8), "a very …");
    }
}
