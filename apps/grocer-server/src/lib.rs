//! # Grocer Server
//!
//! HTTP/JSON boundary over the catalog, the ledger and the checkout engine.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST   /api/products                  register barcode      201 / 409  │
//! │  GET    /api/products                  list all              200        │
//! │  GET    /api/products/latest           newest registration   200 / 404  │
//! │  GET    /api/products/barcode/{code}   lookup by barcode     200 / 404  │
//! │  GET    /api/products/{id}             lookup by id          200 / 404  │
//! │  PUT    /api/products/{id}             replace fields        200 / 404  │
//! │  DELETE /api/products/{id}             delete                200 / 404  │
//! │  POST   /api/transaction               checkout + QR         201 / 400  │
//! │  GET    /api/transactions?limit=N      ledger, newest first  200        │
//! │  GET    /api/server-ip                 LAN address           200 / 500  │
//! │  GET    /health                        store reachability    200 / 503  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every route is traced and CORS is open, so a phone scanner page served
//! from elsewhere on the LAN can post barcodes.

pub mod api;
pub mod config;
pub mod error;
pub mod receipt;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use grocer_db::Database;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult, ErrorCode};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,

    /// Pixel size of one QR module in receipt images
    pub qr_module_px: u32,
}

impl AppState {
    pub fn new(db: Database, qr_module_px: u32) -> Self {
        AppState { db, qr_module_px }
    }
}

/// Builds the full application router with tracing and CORS layers.
pub fn build_router(state: AppState) -> Router {
    api::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
