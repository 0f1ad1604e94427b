//! Receipt output: the PNG from the service saved to disk, plus the same
//! payload drawn with block characters for the terminal.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use qrcode::render::unicode::Dense1x2;
use qrcode::QrCode;

use grocer_core::receipt::payment_payload;
use grocer_core::Money;

#[derive(Debug, thiserror::Error)]
pub enum ReceiptError {
    #[error("Receipt image is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Could not write receipt: {0}")]
    Io(#[from] std::io::Error),

    #[error("QR encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),
}

/// Writes the base64 PNG to `<dir>/receipt-<reference>.png`.
pub async fn save_png(dir: &Path, reference: &str, qr_base64: &str) -> Result<PathBuf, ReceiptError> {
    let png = STANDARD.decode(qr_base64.trim())?;

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name(reference));
    tokio::fs::write(&path, png).await?;
    Ok(path)
}

/// Keeps only characters that are safe in a file name.
fn file_name(reference: &str) -> String {
    let safe: String = reference
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    format!("receipt-{safe}.png")
}

/// The payment QR code as half-block text.
pub fn terminal_qr(total: Money, reference: &str) -> Result<String, ReceiptError> {
    let code = QrCode::new(payment_payload(total, reference).as_bytes())?;
    Ok(code
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}
