//! # grocer-core: Pure Business Logic for Grocer POS
//!
//! Everything in this crate is a pure function or a plain data type. The
//! database layer, the HTTP service and the operator console all build on it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Grocer POS Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────┐   HTTP/JSON   ┌──────────────────────────────┐   │
//! │  │ grocer-console   │──────────────►│ grocer-server (axum)         │   │
//! │  │ cart, poller     │               │ catalog, checkout, receipts  │   │
//! │  └────────┬─────────┘               └──────────────┬───────────────┘   │
//! │           │                                        │                    │
//! │           │         ┌──────────────────────────────▼───────────────┐   │
//! │           │         │            grocer-db (SQLite)                │   │
//! │           │         └──────────────────────────────┬───────────────┘   │
//! │           │                                        │                    │
//! │  ┌────────▼────────────────────────────────────────▼───────────────┐   │
//! │  │               ★ grocer-core (THIS CRATE) ★                      │   │
//! │  │   money · types · barcode · pricing · validation · receipt      │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` and `DiscountRate` over exact decimals
//! - [`types`] - Product, ledger line and checkout types
//! - [`barcode`] - Length-keyed barcode decoding
//! - [`pricing`] - Discounted line totals and checkout totals
//! - [`validation`] - Input validation
//! - [`receipt`] - Payment payload embedded in the receipt QR code
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use grocer_core::money::{DiscountRate, Money};
//! use grocer_core::pricing::line_total;
//!
//! let price = Money::from_cents(1000); // $10.00
//! let total = line_total(price, DiscountRate::from_percent(10), 2).unwrap();
//! assert_eq!(total, Money::from_cents(1800));
//! ```

pub mod barcode;
pub mod error;
pub mod money;
pub mod pricing;
pub mod receipt;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{DiscountRate, Money};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a single cart or checkout request.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest accepted buy or sell price, in whole currency units.
///
/// With the quantity and line limits above this keeps every checkout total
/// far inside what a decimal can hold.
pub const MAX_PRICE: i64 = 1_000_000;

/// Stock level below which the console warns the operator.
pub const LOW_STOCK_THRESHOLD: i64 = 5;
