//! # Product Repository
//!
//! The catalog store: products keyed by a unique barcode.
//!
//! ## Key Operations
//! - Register a scanned barcode (decoder defaults + caller overrides)
//! - Lookup by barcode or id, full listing, latest registration
//! - Replace editable fields, delete
//! - Low-stock report
//!
//! ## Registration Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/products {"barcode": "5012345678900"}                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NewProduct::from_barcode ── validate + decode + overrides (core)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write gate ──► INSERT ... RETURNING                                   │
//! │       │                                                                 │
//! │       ├── UNIQUE(barcode) fails → DbError::UniqueViolation (409)       │
//! │       │                                                                 │
//! │       └── Product { sell_price: 0 } → console asks operator for price  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::pool::WriteGate;
use grocer_core::{DiscountRate, Money, NewProduct, Product, ProductOverrides, ProductUpdate};

/// Column list shared by every product query.
pub(crate) const PRODUCT_COLUMNS: &str = "id, barcode, product_type, manufacturer_code, \
     product_code, name, buy_price, sell_price, discount, stock, created_at, updated_at";

/// Raw `products` row; money columns are decimal strings.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    id: i64,
    barcode: String,
    product_type: String,
    manufacturer_code: String,
    product_code: String,
    name: String,
    buy_price: String,
    sell_price: String,
    discount: String,
    stock: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        let invalid = |column: &str, value: &str| {
            DbError::InvalidData(format!("products.{column} = '{value}' for id {}", row.id))
        };

        Ok(Product {
            buy_price: Money::from_str(&row.buy_price)
                .map_err(|_| invalid("buy_price", &row.buy_price))?,
            sell_price: Money::from_str(&row.sell_price)
                .map_err(|_| invalid("sell_price", &row.sell_price))?,
            discount: DiscountRate::from_str(&row.discount)
                .map_err(|_| invalid("discount", &row.discount))?,
            id: row.id,
            barcode: row.barcode,
            product_type: row.product_type,
            manufacturer_code: row.manufacturer_code,
            product_code: row.product_code,
            name: row.name,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> DbResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Repository for catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.register("5012345678900", ProductOverrides::default()).await?;
/// let same = repo.get_by_barcode("5012345678900").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    write_gate: WriteGate,
}

impl ProductRepository {
    pub(crate) fn new(pool: SqlitePool, write_gate: WriteGate) -> Self {
        ProductRepository { pool, write_gate }
    }

    // ===== Writes =====

    /// Registers a newly scanned barcode.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Stored record with its assigned id
    /// * `Err(DbError::Core(Validation))` - Bad barcode or override
    /// * `Err(DbError::UniqueViolation)` - Barcode already registered
    pub async fn register(&self, barcode: &str, overrides: ProductOverrides) -> DbResult<Product> {
        let new = NewProduct::from_barcode(barcode, overrides)?;
        debug!(barcode = %new.barcode, "Registering product");

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO products (
                barcode, product_type, manufacturer_code, product_code, name,
                buy_price, sell_price, discount, stock, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            RETURNING {PRODUCT_COLUMNS}"
        );

        let _gate = self.write_gate.lock().await;
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&new.barcode)
            .bind(&new.product_type)
            .bind(&new.manufacturer_code)
            .bind(&new.product_code)
            .bind(&new.name)
            .bind(new.buy_price.to_storage_string())
            .bind(new.sell_price.to_storage_string())
            .bind(new.discount.to_storage_string())
            .bind(new.stock)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("barcode", &new.barcode),
                other => other,
            })?;

        let product = Product::try_from(row)?;
        info!(id = product.id, barcode = %product.barcode, "Product registered");
        Ok(product)
    }

    /// Replaces a product's name, prices, discount and stock.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The updated record
    /// * `Err(DbError::NotFound)` - No product with this id
    pub async fn update(&self, id: i64, update: &ProductUpdate) -> DbResult<Product> {
        update.validate()?;
        debug!(id, "Updating product");

        let sql = format!(
            "UPDATE products SET
                name = ?2,
                buy_price = ?3,
                sell_price = ?4,
                discount = ?5,
                stock = ?6,
                updated_at = ?7
            WHERE id = ?1
            RETURNING {PRODUCT_COLUMNS}"
        );

        let _gate = self.write_gate.lock().await;
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(update.name.trim())
            .bind(update.buy_price.to_storage_string())
            .bind(update.sell_price.to_storage_string())
            .bind(update.discount.to_storage_string())
            .bind(update.stock)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        Product::try_from(row)
    }

    /// Deletes a product. Ledger rows that mention it are left untouched.
    pub async fn remove(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let _gate = self.write_gate.lock().await;
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(id, "Product deleted");
        Ok(())
    }

    // ===== Reads =====

    /// Gets a product by barcode.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Product> {
        let barcode = barcode.trim();
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1");

        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", barcode))?;

        Product::try_from(row)
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Product> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        Product::try_from(row)
    }

    /// Lists every product, oldest registration first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed products");
        into_products(rows)
    }

    /// The most recently registered product, if any.
    ///
    /// The console polls this to notice new scans.
    pub async fn latest(&self) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id DESC LIMIT 1");

        sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_optional(&self.pool)
            .await?
            .map(Product::try_from)
            .transpose()
    }

    /// Products whose stock is below `threshold`, lowest stock first.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock < ?1 ORDER BY stock, id"
        );

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(threshold)
            .fetch_all(&self.pool)
            .await?;

        into_products(rows)
    }

    /// Counts products (for health checks and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
