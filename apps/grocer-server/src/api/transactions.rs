//! Ledger history endpoint.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use grocer_core::TransactionLine;

use crate::error::ApiResult;
use crate::AppState;

const DEFAULT_LIMIT: i64 = 50;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/transactions", get(history))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// GET /api/transactions?limit=N
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<TransactionLine>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    Ok(Json(state.db.ledger().recent(limit).await?))
}
