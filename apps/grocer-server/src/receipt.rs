//! # Receipt Rendering
//!
//! Turns a committed checkout into the payment QR code handed to the customer.
//!
//! ```text
//! CheckoutSummary { total, reference }
//!        │
//!        ▼
//! "Payment: $18.00|TransactionID:<uuid>"   (grocer_core::receipt)
//!        │  QrCode::new
//!        ▼
//! Luma8 bitmap (module_px per module, quiet zone)
//!        │  PNG encode
//!        ▼
//! base64 string  ──► CheckoutReceipt.qr_code
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

use grocer_core::receipt::payment_payload;
use grocer_core::Money;

#[derive(Debug, thiserror::Error)]
pub enum ReceiptError {
    #[error("QR encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Renders `payload` as a PNG QR code.
pub fn render_qr_png(payload: &str, module_px: u32) -> Result<Vec<u8>, ReceiptError> {
    let code = QrCode::new(payload.as_bytes())?;
    let bitmap = code
        .render::<Luma<u8>>()
        .module_dimensions(module_px, module_px)
        .quiet_zone(true)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(bitmap).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Base64 PNG QR code for a committed checkout.
pub fn render_payment_qr(
    total: Money,
    reference: &str,
    module_px: u32,
) -> Result<String, ReceiptError> {
    let payload = payment_payload(total, reference);
    let png = render_qr_png(&payload, module_px)?;
    Ok(STANDARD.encode(png))
}
