//! # Domain Types
//!
//! Catalog, ledger and checkout types shared by the store, the HTTP service
//! and the operator console.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │ TransactionLine │   │ CheckoutSummary │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (integer)   │   │  id (integer)   │   │  reference      │       │
//! │  │  barcode (uniq) │   │  barcode        │   │  total          │       │
//! │  │  sell_price     │   │  total          │   │  lines          │       │
//! │  │  discount       │   │  reference      │   └─────────────────┘       │
//! │  │  stock          │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Inputs:  ProductOverrides → NewProduct,  ProductUpdate,  CheckoutItem │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Products carry a store-assigned integer `id` used by update and delete,
//! and a unique `barcode` used by scanning and checkout. Ledger lines hold a
//! snapshot of the barcode and name rather than a foreign key, so deleting a
//! product never rewrites history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::barcode::{self, DEFAULT_STOCK};
use crate::error::CoreResult;
use crate::money::{DiscountRate, Money};
use crate::validation::{
    validate_barcode, validate_discount, validate_price, validate_product_name, validate_stock,
};

// =============================================================================
// Product
// =============================================================================

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: i64,

    /// Unique scanned code.
    pub barcode: String,

    /// Descriptive segments derived from the barcode (informational only).
    pub product_type: String,
    pub manufacturer_code: String,
    pub product_code: String,

    /// Display name shown to the operator and on the ledger.
    pub name: String,

    pub buy_price: Money,

    /// Price per unit before discount. Zero means "not yet priced".
    pub sell_price: Money,

    /// Percentage discount applied at checkout.
    pub discount: DiscountRate,

    /// On-hand quantity, never negative.
    pub stock: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// A freshly scanned product that the operator has not priced yet.
    pub fn needs_pricing(&self) -> bool {
        self.sell_price.is_zero()
    }

    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock < threshold
    }

    /// Unit price after discount.
    pub fn effective_price(&self) -> Money {
        self.sell_price.apply_discount(self.discount)
    }
}

/// Optional fields a caller may supply when registering a barcode.
///
/// Anything left out falls back to what the barcode decoder derives, with a
/// sell price of zero and no discount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductOverrides {
    pub name: Option<String>,
    pub product_type: Option<String>,
    pub manufacturer_code: Option<String>,
    pub product_code: Option<String>,
    pub buy_price: Option<Money>,
    pub sell_price: Option<Money>,
    pub discount: Option<DiscountRate>,
    pub stock: Option<i64>,
}

/// A validated product ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub barcode: String,
    pub product_type: String,
    pub manufacturer_code: String,
    pub product_code: String,
    pub name: String,
    pub buy_price: Money,
    pub sell_price: Money,
    pub discount: DiscountRate,
    pub stock: i64,
}

impl NewProduct {
    /// Builds a product from a scanned barcode plus caller overrides.
    ///
    /// ## Flow
    /// ```text
    /// "5012345678900" ──► validate ──► barcode::decode ──► defaults
    ///                                                          │
    ///                     overrides (name, prices, ...) ───────┤
    ///                                                          ▼
    ///                                               validate fields ──► NewProduct
    /// ```
    pub fn from_barcode(barcode: &str, overrides: ProductOverrides) -> CoreResult<Self> {
        let barcode = validate_barcode(barcode)?;
        let decoded = barcode::decode(&barcode);

        let product = NewProduct {
            name: overrides
                .name
                .map(|n| n.trim().to_string())
                .unwrap_or(decoded.name),
            product_type: overrides.product_type.unwrap_or(decoded.product_type),
            manufacturer_code: overrides
                .manufacturer_code
                .unwrap_or(decoded.manufacturer_code),
            product_code: overrides.product_code.unwrap_or(decoded.product_code),
            buy_price: overrides
                .buy_price
                .unwrap_or_else(barcode::default_buy_price),
            sell_price: overrides.sell_price.unwrap_or_else(Money::zero),
            discount: overrides.discount.unwrap_or_else(DiscountRate::none),
            stock: overrides.stock.unwrap_or(DEFAULT_STOCK),
            barcode,
        };

        validate_product_name(&product.name)?;
        validate_price("buy_price", product.buy_price)?;
        validate_price("sell_price", product.sell_price)?;
        validate_discount(product.discount)?;
        validate_stock(product.stock)?;

        Ok(product)
    }
}

/// Replacement values for an existing product's editable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub buy_price: Money,
    pub sell_price: Money,
    #[serde(default)]
    pub discount: DiscountRate,
    pub stock: i64,
}

impl ProductUpdate {
    pub fn validate(&self) -> CoreResult<()> {
        validate_product_name(&self.name)?;
        validate_price("buy_price", self.buy_price)?;
        validate_price("sell_price", self.sell_price)?;
        validate_discount(self.discount)?;
        validate_stock(self.stock)?;
        Ok(())
    }
}

impl From<&Product> for ProductUpdate {
    fn from(product: &Product) -> Self {
        ProductUpdate {
            name: product.name.clone(),
            buy_price: product.buy_price,
            sell_price: product.sell_price,
            discount: product.discount,
            stock: product.stock,
        }
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// One sold line in the append-only ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLine {
    pub id: i64,
    pub barcode: String,
    /// Product name at the time of sale.
    pub name: String,
    pub quantity: i64,
    /// Line total after discount, unrounded.
    pub total: Money,
    /// Groups the lines of one checkout.
    pub reference: String,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Checkout
// =============================================================================

/// One requested line of a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub barcode: String,
    pub quantity: i64,
}

/// Body of `POST /api/transaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

/// A priced and committed checkout line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub barcode: String,
    pub name: String,
    pub quantity: i64,
    /// Sell price before discount.
    pub unit_price: Money,
    pub discount: DiscountRate,
    pub line_total: Money,
}

/// What the store returns after a committed checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub reference: String,
    /// Sum of unrounded line totals.
    pub total: Money,
    pub lines: Vec<CheckoutLine>,
}

/// Body returned by `POST /api/transaction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub message: String,
    pub total: Money,
    pub reference: String,
    /// Base64 PNG of the payment QR code.
    pub qr_code: String,
    pub lines: Vec<CheckoutLine>,
}

// =============================================================================
// Service Replies
// =============================================================================

/// Acknowledgement body for mutations that return no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Ack {
            message: message.into(),
        }
    }
}

/// Body of `GET /api/server-ip`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAddress {
    pub ip: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub products: i64,
}
