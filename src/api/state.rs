//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::api::auth::AdminCredentials;
use crate::store::WaitlistStore;
use crate::websocket::{ConnectionHub, HubConfig};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// The waitlist collection
    pub store: Arc<WaitlistStore>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Admin code checked by admin routes and the `waitlist` topic
    pub admin: AdminCredentials,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// WebSocket connection hub for live queries
    pub ws_hub: Arc<ConnectionHub>,
}

impl AppState {
    pub fn new(store: Arc<WaitlistStore>, config: ApiConfig, admin: AdminCredentials) -> Self {
        Self::with_ws_config(store, config, admin, HubConfig::default())
    }

    /// Create AppState with custom WebSocket hub configuration
    pub fn with_ws_config(
        store: Arc<WaitlistStore>,
        config: ApiConfig,
        admin: AdminCredentials,
        hub_config: HubConfig,
    ) -> Self {
        let ws_hub = Arc::new(ConnectionHub::new(hub_config, Arc::clone(&store)));
        Self {
            store,
            config: Arc::new(config),
            admin,
            start_time: Instant::now(),
            ws_hub,
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get WebSocket connection count
    pub async fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count().await
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Origins allowed by CORS; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            max_body_size: 64 * 1024,
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
