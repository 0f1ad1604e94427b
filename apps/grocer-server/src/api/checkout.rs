//! Checkout endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use grocer_core::{CheckoutReceipt, CheckoutRequest};

use crate::error::{ApiError, ApiResult};
use crate::receipt::render_payment_qr;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/transaction", post(record_transaction))
}

/// POST /api/transaction
///
/// ## Flow
/// ```text
/// { "items": [{ "barcode": "...", "quantity": 2 }] }
///      │
///      ▼
/// db.checkout().execute ── InsufficientStock / Validation ──► 400
///      │ committed
///      ▼
/// render QR ──► 201 { message, total, reference, qr_code, lines }
/// ```
pub async fn record_transaction(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CheckoutReceipt>)> {
    let Json(request) = payload?;

    let summary = state.db.checkout().execute(&request.items).await?;

    // The sale is already committed; a rendering failure must still name it
    let qr_code = render_payment_qr(summary.total, &summary.reference, state.qr_module_px)
        .map_err(|e| {
            error!(reference = %summary.reference, error = %e, "Receipt rendering failed");
            ApiError::internal(format!(
                "Transaction {} recorded but the receipt could not be rendered",
                summary.reference
            ))
        })?;

    info!(reference = %summary.reference, total = %summary.total, "Transaction recorded");

    Ok((
        StatusCode::CREATED,
        Json(CheckoutReceipt {
            message: "Transaction recorded".to_string(),
            total: summary.total,
            reference: summary.reference,
            qr_code,
            lines: summary.lines,
        }),
    ))
}
