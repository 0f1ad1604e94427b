//! # Seed Data Generator
//!
//! Fills an empty database with a small priced catalog for demos.
//!
//! ## Usage
//! ```bash
//! cargo run -p grocer-db --bin seed
//! cargo run -p grocer-db --bin seed -- --db ./data/grocer.db
//! ```

use grocer_core::{DiscountRate, Money, ProductOverrides};
use grocer_db::{Database, DbConfig};
use std::env;

/// (barcode, name, sell price in cents, discount %, stock)
const PRODUCTS: &[(&str, &str, i64, u32, i64)] = &[
    ("5012345678900", "Oat Milk 1L", 249, 0, 24),
    ("5000112637922", "Sparkling Water 500ml", 99, 0, 48),
    ("5010029000016", "Breakfast Biscuits", 189, 10, 12),
    ("5000169005088", "Whole Wheat Bread", 135, 0, 8),
    ("036000291452", "Paper Towels", 399, 15, 6),
    ("012345678905", "Peanut Butter", 329, 0, 4),
    ("4006381333931", "Highlighter Pen", 150, 0, 30),
    ("8712345678906", "Gouda Cheese 250g", 425, 20, 3),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./grocer_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Grocer POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./grocer_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Grocer POS Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut generated = 0;
    for (barcode, name, cents, discount, stock) in PRODUCTS {
        let overrides = ProductOverrides {
            name: Some(name.to_string()),
            buy_price: Some(Money::from_cents(cents * 6 / 10)),
            sell_price: Some(Money::from_cents(*cents)),
            discount: Some(DiscountRate::from_percent(*discount)),
            stock: Some(*stock),
            ..Default::default()
        };

        match db.products().register(barcode, overrides).await {
            Ok(product) => {
                generated += 1;
                println!("  + {:<15} {:<24} {}", product.barcode, product.name, product.sell_price);
            }
            Err(e) => eprintln!("Failed to insert {}: {}", barcode, e),
        }
    }

    println!();
    println!("✓ Seeded {} products", generated);

    let low = db.products().low_stock(grocer_core::LOW_STOCK_THRESHOLD).await?;
    if !low.is_empty() {
        println!("  {} of them start below the low-stock threshold", low.len());
    }

    db.close().await;
    Ok(())
}
