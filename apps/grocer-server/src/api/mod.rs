//! HTTP handlers, grouped by resource.

pub mod checkout;
pub mod products;
pub mod system;
pub mod transactions;

use axum::Router;

use crate::AppState;

/// All routes, before layers and state are attached.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(products::router())
        .merge(checkout::router())
        .merge(transactions::router())
        .merge(system::router())
}
