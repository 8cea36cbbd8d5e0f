//! Stellar Forge REST API
//!
//! HTTP API layer for the waitlist, built with Axum.
//!
//! # Endpoints
//!
//! ## Waitlist (public)
//! - `POST /api/v1/waitlist` - Join the waitlist
//! - `GET /api/v1/waitlist/status?email=` - Status for an email
//!
//! ## Admin (`X-Admin-Code` header)
//! - `POST /api/v1/admin/session` - Verify an admin code (no header needed)
//! - `GET /api/v1/admin/waitlist` - All entries, oldest first
//! - `GET /api/v1/admin/waitlist/:id` - One entry
//! - `POST /api/v1/admin/waitlist/:id/ready` - Mark ready
//! - `DELETE /api/v1/admin/waitlist/:id` - Remove
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /api/v1/ws` - Live queries (`entry.{email}`, `waitlist`)
//!
//! # Example
//!
//! ```rust,ignore
//! use stellar_forge::api::{serve, AdminCredentials, ApiConfig, AppState};
//! use stellar_forge::store::{StoreConfig, WaitlistStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(WaitlistStore::open(&StoreConfig::default())?);
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(store, config.clone(), AdminCredentials::new("secret"));
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use auth::{AdminAccess, AdminCredentials, ADMIN_CODE_HEADER};
pub use error::{ApiError, ApiResult};
pub use extract::JsonBody;
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;
    let cors = cors_layer(&state.config.cors_origins);

    let api_routes = Router::new()
        // Public waitlist routes
        .route("/waitlist", post(routes::waitlist::create_entry))
        .route("/waitlist/status", get(routes::waitlist::entry_status))
        // Admin routes
        .route("/admin/session", post(routes::admin::open_session))
        .route("/admin/waitlist", get(routes::admin::list_entries))
        .route(
            "/admin/waitlist/:id",
            get(routes::admin::get_entry).delete(routes::admin::remove_entry),
        )
        .route("/admin/waitlist/:id/ready", post(routes::admin::mark_ready))
        .layer(DefaultBodyLimit::max(max_body_size))
        // WebSocket route
        .route("/ws", get(websocket_handler));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS for the configured origins; any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(ADMIN_CODE_HEADER),
        ])
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Stellar Forge API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Stellar Forge API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
