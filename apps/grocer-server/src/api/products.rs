//! Catalog endpoints.
//!
//! | Method   | Path                            | Handler      |
//! |----------|---------------------------------|--------------|
//! | `POST`   | `/api/products`                 | [`register`] |
//! | `GET`    | `/api/products`                 | [`list`]     |
//! | `GET`    | `/api/products/latest`          | [`latest`]   |
//! | `GET`    | `/api/products/barcode/{code}`  | [`by_barcode`] |
//! | `GET`    | `/api/products/{id}`            | [`by_id`]    |
//! | `PUT`    | `/api/products/{id}`            | [`update`]   |
//! | `DELETE` | `/api/products/{id}`            | [`remove`]   |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use grocer_core::{Ack, Product, ProductOverrides, ProductUpdate};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(register))
        .route("/api/products/latest", get(latest))
        .route("/api/products/barcode/{code}", get(by_barcode))
        .route("/api/products/{id}", get(by_id).put(update).delete(remove))
}

/// Body of `POST /api/products`: a barcode plus any optional overrides.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub barcode: Option<String>,
    #[serde(flatten)]
    pub overrides: ProductOverrides,
}

fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::validation(format!("Invalid product id: {raw}")))
}

/// POST /api/products
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(req) = payload?;
    let barcode = req
        .barcode
        .ok_or_else(|| ApiError::validation("barcode is required"))?;

    let product = state.db.products().register(&barcode, req.overrides).await?;
    info!(id = product.id, barcode = %product.barcode, "Product added");

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.db.products().list().await?))
}

/// GET /api/products/latest
pub async fn latest(State(state): State<AppState>) -> ApiResult<Json<Product>> {
    state
        .db
        .products()
        .latest()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", "latest"))
}

/// GET /api/products/barcode/{code}
pub async fn by_barcode(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.db.products().get_by_barcode(&code).await?))
}

/// GET /api/products/{id}
pub async fn by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = parse_id(&id)?;
    Ok(Json(state.db.products().get_by_id(id).await?))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> ApiResult<Json<Ack>> {
    let id = parse_id(&id)?;
    let Json(update) = payload?;

    state.db.products().update(id, &update).await?;
    info!(id, "Product updated");

    Ok(Json(Ack::new("Product updated")))
}

/// DELETE /api/products/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Ack>> {
    let id = parse_id(&id)?;
    state.db.products().remove(id).await?;

    Ok(Json(Ack::new("Product deleted")))
}
