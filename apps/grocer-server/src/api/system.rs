//! Service discovery and health.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::net::IpAddr;
use tokio::net::UdpSocket;
use tracing::warn;

use grocer_core::{HealthStatus, ServerAddress};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Any routable address works; no packet is sent by a UDP connect.
const ROUTE_PROBE: &str = "8.8.8.8:80";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/server-ip", get(server_ip))
        .route("/health", get(health))
}

/// The address other devices on the LAN should use to reach this server.
pub async fn local_ip() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(ROUTE_PROBE).await?;
    Ok(socket.local_addr()?.ip())
}

/// GET /api/server-ip
pub async fn server_ip() -> ApiResult<Json<ServerAddress>> {
    let ip = local_ip().await.map_err(|e| {
        warn!(error = %e, "Could not determine server address");
        ApiError::internal(format!("Could not determine server address: {e}"))
    })?;

    Ok(Json(ServerAddress { ip: ip.to_string() }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthStatus>> {
    if !state.db.health_check().await {
        return Err(ApiError::unavailable("Database unavailable"));
    }

    let products = state.db.products().count().await?;
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
        products,
    }))
}
