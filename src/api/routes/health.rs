//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (store answers queries)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{EntryCounts, HealthResponse};
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the store can answer a query.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.store.stats().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// GET /health
///
/// Full health status with entry counts.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = state.store.stats().await;

    let (status, store, entries) = match stats {
        Ok(stats) => (
            "healthy",
            "ok",
            Some(EntryCounts {
                total: stats.total,
                pending: stats.pending,
                ready: stats.ready,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            ("unhealthy", "error", None)
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        store: store.to_string(),
        entries,
        websocket_connections: state.ws_connection_count().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
