//! # Receipt Payload
//!
//! Text encoded into the payment QR code handed to the customer.
//!
//! ```text
//! Payment: $18.00|TransactionID:6f1c2a9e-...
//! ```
//!
//! The service renders the payload as a PNG and the console redraws it in
//! the terminal; this module only fixes the format both sides use.

use crate::money::Money;

/// Builds the QR payload for a committed checkout.
///
/// ```rust
/// use grocer_core::money::Money;
/// use grocer_core::receipt::payment_payload;
///
/// assert_eq!(
///     payment_payload(Money::from_cents(1800), "abc"),
///     "Payment: $18.00|TransactionID:abc"
/// );
/// ```
pub fn payment_payload(total: Money, reference: &str) -> String {
    format!("Payment: {total}|TransactionID:{reference}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payload_rounds_total() {
        let payload = payment_payload(Money::from_decimal(dec!(16.9830)), "ref-1");
        assert_eq!(payload, "Payment: $16.98|TransactionID:ref-1");
    }
}
