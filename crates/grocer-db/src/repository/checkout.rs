//! # Checkout Engine
//!
//! Turns a list of `(barcode, quantity)` lines into a committed sale.
//!
//! ## All-or-Nothing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  execute([{A, 2}, {B, 6}])                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate shape (core) ──► acquire write gate ──► BEGIN                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each line, in order:                                              │
//! │    SELECT product ─── missing ──────────────┐                          │
//! │       │                                      │                          │
//! │    stock >= qty? ──── no ───────────────────┤                          │
//! │       │                                      ▼                          │
//! │    UPDATE stock = stock - qty          InsufficientStock               │
//! │      WHERE stock >= qty                 (tx dropped → ROLLBACK)        │
//! │       │                                                                 │
//! │    INSERT ledger row (snapshot name, line total, reference)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ──► CheckoutSummary { reference, total, lines }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writers are serialized by the write gate, so no other write can slip in
//! between a line's stock check and its decrement. The `stock >= qty`
//! predicate still guards the UPDATE in case another process shares the
//! file.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::pool::WriteGate;
use crate::repository::ledger::{self, LedgerEntry};
use crate::repository::product::{ProductRow, PRODUCT_COLUMNS};
use grocer_core::pricing::{grand_total, line_total};
use grocer_core::validation::validate_checkout_items;
use grocer_core::{CheckoutItem, CheckoutLine, CheckoutSummary, CoreError, Product};

/// Executes checkouts against the catalog and the ledger.
#[derive(Debug, Clone)]
pub struct CheckoutRepository {
    pool: SqlitePool,
    write_gate: WriteGate,
}

impl CheckoutRepository {
    pub(crate) fn new(pool: SqlitePool, write_gate: WriteGate) -> Self {
        CheckoutRepository { pool, write_gate }
    }

    /// Runs one checkout atomically.
    ///
    /// ## Returns
    /// * `Ok(CheckoutSummary)` - Committed; stock decremented, ledger written
    /// * `Err(DbError::Core(InsufficientStock))` - Unknown barcode or not
    ///   enough stock on some line; nothing was written
    /// * `Err(DbError::Core(Validation))` - Empty list, bad quantity, or a
    ///   total too large to compute; nothing was written
    pub async fn execute(&self, items: &[CheckoutItem]) -> DbResult<CheckoutSummary> {
        validate_checkout_items(items)?;

        let reference = Uuid::new_v4().to_string();
        let now = Utc::now();
        debug!(reference = %reference, lines = items.len(), "Starting checkout");

        let _gate = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;
        let select = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1");
        let mut lines = Vec::with_capacity(items.len());

        for item in items {
            let barcode = item.barcode.trim();
            let insufficient = |available: i64| {
                warn!(
                    barcode = %barcode,
                    available,
                    requested = item.quantity,
                    "Checkout rejected"
                );
                DbError::Core(CoreError::InsufficientStock {
                    barcode: barcode.to_string(),
                    available,
                    requested: item.quantity,
                })
            };

            let row = sqlx::query_as::<_, ProductRow>(&select)
                .bind(barcode)
                .fetch_optional(&mut *tx)
                .await?;
            let product = match row {
                Some(row) => Product::try_from(row)?,
                None => return Err(insufficient(0)),
            };

            if product.stock < item.quantity {
                return Err(insufficient(product.stock));
            }

            let decremented = sqlx::query(
                "UPDATE products SET stock = stock - ?1, updated_at = ?2
                 WHERE id = ?3 AND stock >= ?1",
            )
            .bind(item.quantity)
            .bind(now)
            .bind(product.id)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                return Err(insufficient(product.stock));
            }

            let total = line_total(product.sell_price, product.discount, item.quantity)?;
            ledger::append(
                &mut tx,
                &LedgerEntry {
                    barcode: &product.barcode,
                    name: &product.name,
                    quantity: item.quantity,
                    total,
                    reference: &reference,
                    timestamp: now,
                },
            )
            .await?;

            lines.push(CheckoutLine {
                barcode: product.barcode,
                name: product.name,
                quantity: item.quantity,
                unit_price: product.sell_price,
                discount: product.discount,
                line_total: total,
            });
        }

        let total = grand_total(lines.iter().map(|line| line.line_total))?;
        tx.commit().await?;

        info!(reference = %reference, total = %total, lines = lines.len(), "Checkout committed");

        Ok(CheckoutSummary {
            reference,
            total,
            lines,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use grocer_core::{
        CheckoutItem, CoreError, DiscountRate, Money, ProductOverrides, ValidationError,
    };

    fn money(text: &str) -> Money {
        text.parse().unwrap()
    }

    fn item(barcode: &str, quantity: i64) -> CheckoutItem {
        CheckoutItem {
            barcode: barcode.to_string(),
            quantity,
        }
    }

    /// Oat milk: sells at 10.00 with 10% off, 5 in stock.
    async fn db_with_oat_milk() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let overrides = ProductOverrides {
            name: Some("Oat Milk".to_string()),
            sell_price: Some(Money::from_cents(1000)),
            discount: Some(DiscountRate::from_percent(10)),
            stock: Some(5),
            ..Default::default()
        };
        db.products()
            .register("5012345678900", overrides)
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_checkout_applies_discount_and_decrements_stock() {
        let db = db_with_oat_milk().await;

        let summary = db
            .checkout()
            .execute(&[item("5012345678900", 2)])
            .await
            .unwrap();

        assert_eq!(summary.total, Money::from_cents(1800));
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.lines[0].name, "Oat Milk");
        assert_eq!(summary.lines[0].line_total, Money::from_cents(1800));

        let product = db.products().get_by_barcode("5012345678900").await.unwrap();
        assert_eq!(product.stock, 3);

        let ledger = db.ledger().by_reference(&summary.reference).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].total, Money::from_cents(1800));
        assert_eq!(ledger[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_insufficient_stock_changes_nothing() {
        let db = db_with_oat_milk().await;

        let err = db
            .checkout()
            .execute(&[item("5012345678900", 6)])
            .await
            .unwrap_err();

        match err {
            DbError::Core(CoreError::InsufficientStock {
                barcode,
                available,
                requested,
            }) => {
                assert_eq!(barcode, "5012345678900");
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        let product = db.products().get_by_barcode("5012345678900").await.unwrap();
        assert_eq!(product.stock, 5);
        assert_eq!(db.ledger().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failure_on_later_line_rolls_back_earlier_lines() {
        let db = db_with_oat_milk().await;
        db.products()
            .register(
                "036000291452",
                ProductOverrides {
                    sell_price: Some(Money::from_cents(250)),
                    stock: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = db
            .checkout()
            .execute(&[item("5012345678900", 2), item("036000291452", 2)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InsufficientStock { available: 1, .. })
        ));

        let first = db.products().get_by_barcode("5012345678900").await.unwrap();
        assert_eq!(first.stock, 5);
        assert_eq!(db.ledger().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_barcode_reports_zero_available() {
        let db = db_with_oat_milk().await;

        let err = db
            .checkout()
            .execute(&[item("0000000000000", 1)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Core(CoreError::InsufficientStock { available: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_repeated_barcode_uses_remaining_stock() {
        let db = db_with_oat_milk().await;

        let err = db
            .checkout()
            .execute(&[item("5012345678900", 3), item("5012345678900", 3)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InsufficientStock { available: 2, .. })
        ));

        let summary = db
            .checkout()
            .execute(&[item("5012345678900", 3), item("5012345678900", 2)])
            .await
            .unwrap();
        assert_eq!(summary.total, Money::from_cents(4500));
        assert_eq!(
            db.products().get_by_barcode("5012345678900").await.unwrap().stock,
            0
        );
    }

    #[tokio::test]
    async fn test_total_is_sum_of_unrounded_lines() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .register(
                "777",
                ProductOverrides {
                    sell_price: Some(money("3.33")),
                    discount: Some(DiscountRate::from_percent(15)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let summary = db.checkout().execute(&[item("777", 3)]).await.unwrap();
        assert_eq!(summary.total, money("8.4915"));
        assert_eq!(summary.total.to_string(), "$8.49");
    }

    #[tokio::test]
    async fn test_overflowing_total_is_rejected_without_writes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let huge = money("70000000000000000000000000000");

        // The catalog refuses such a price outright
        let err = db
            .products()
            .register(
                "777",
                ProductOverrides {
                    sell_price: Some(huge),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));

        // A row written behind the store's back still cannot panic checkout
        db.products()
            .register("777", ProductOverrides::default())
            .await
            .unwrap();
        sqlx::query("UPDATE products SET sell_price = ?1, stock = 10 WHERE barcode = '777'")
            .bind(huge.to_storage_string())
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.checkout().execute(&[item("777", 2)]).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::Validation(ValidationError::Overflow { .. }))
        ));

        assert_eq!(db.products().get_by_barcode("777").await.unwrap().stock, 10);
        assert_eq!(db.ledger().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_checkout_is_validation_error() {
        let db = db_with_oat_milk().await;

        let err = db.checkout().execute(&[]).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));

        let err = db
            .checkout()
            .execute(&[item("5012345678900", 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_never_oversell() {
        let db = db_with_oat_milk().await;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move {
                    db.checkout().execute(&[item("5012345678900", 2)]).await
                })
            })
            .collect();

        let mut committed = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                committed += 1;
            }
        }

        assert_eq!(committed, 2);
        let product = db.products().get_by_barcode("5012345678900").await.unwrap();
        assert_eq!(product.stock, 1);
        assert_eq!(db.ledger().count().await.unwrap(), 2);
    }
}
