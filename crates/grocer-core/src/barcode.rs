//! # Barcode Decoding
//!
//! Derives default catalog fields from a freshly scanned barcode.
//!
//! This is a length-keyed slicing heuristic, not a symbology decoder. No
//! check digit is validated and the segments are only informational; the
//! operator is expected to correct the name and prices afterwards.
//!
//! ```text
//! 13 chars  5 0 1 │ 2 3 4 5 │ 6 7 8 9 0 │ 0      prefix "501" starts "50" → General
//!           prefix  manuf.    product    (ignored)
//!
//! 12 chars  0 │ 1 2 3 4 5 │ 6 7 8 9 0 │ 1        prefix "0" → General
//!
//! other     A B C │ D E F G                      first half / second half
//! ```
//!
//! Slicing is by `char`, so no input can panic.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Buy price assigned to newly registered products.
pub fn default_buy_price() -> Money {
    Money::from_cents(100)
}

/// Stock assigned to newly registered products.
pub const DEFAULT_STOCK: i64 = 10;

pub const TYPE_GENERAL: &str = "General";
pub const TYPE_UNKNOWN: &str = "Unknown";

/// Fields derived from a barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedBarcode {
    pub product_type: String,
    pub manufacturer_code: String,
    pub product_code: String,
    pub name: String,
}

/// Decodes a barcode into its descriptive segments.
///
/// ## Example
/// ```rust
/// use grocer_core::barcode::decode;
///
/// let decoded = decode("501234567890");
/// assert_eq!(decoded.manufacturer_code, "01234");
/// assert_eq!(decoded.product_code, "56789");
/// assert_eq!(decoded.product_type, "Unknown");
/// ```
pub fn decode(barcode: &str) -> DecodedBarcode {
    let barcode = barcode.trim();
    let chars: Vec<char> = barcode.chars().collect();
    let segment = |from: usize, to: usize| -> String { chars[from..to].iter().collect() };

    match chars.len() {
        13 => {
            let prefix = segment(0, 3);
            let product_code = segment(7, 12);
            DecodedBarcode {
                product_type: type_name(prefix.starts_with("50")),
                manufacturer_code: segment(3, 7),
                name: format!("Product {product_code}"),
                product_code,
            }
        }
        12 => {
            let prefix = segment(0, 1);
            let product_code = segment(6, 11);
            DecodedBarcode {
                product_type: type_name(prefix == "0"),
                manufacturer_code: segment(1, 6),
                name: format!("Item {product_code}"),
                product_code,
            }
        }
        len => {
            let half = len / 2;
            DecodedBarcode {
                product_type: TYPE_UNKNOWN.to_string(),
                manufacturer_code: segment(0, half),
                product_code: segment(half, len),
                name: format!("Unknown {barcode}"),
            }
        }
    }
}

fn type_name(general: bool) -> String {
    let name = if general { TYPE_GENERAL } else { TYPE_UNKNOWN };
    name.to_string()
}
