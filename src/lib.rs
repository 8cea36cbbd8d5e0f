//! # Stellar Forge
//!
//! Waitlist service behind the Stellar Forge marketing site: visitors join a
//! waitlist, watch their own entry move from `pending` to `ready`, and an
//! admin manages every entry from a live dashboard.
//!
//! ## Features
//!
//! - **Persistent waitlist**: SQLite-backed `waitlist` collection
//! - **Live queries**: status and list subscriptions pushed over WebSocket
//! - **Admin API**: mark ready, remove, inspect, gated by a shared code
//!
//! ## Modules
//!
//! - [`store`]: The waitlist collection and its live queries
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: Subscription hub for browser clients
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stellar_forge::store::{LiveQuery, NewEntry, Snapshot, StoreConfig, WaitlistStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(WaitlistStore::open(&StoreConfig::new("./data"))?);
//!
//!     let entry = store
//!         .create(NewEntry::new("Ada", "ada@example.com", "Love space sims"))
//!         .await?;
//!
//!     let mut status = store.watch(LiveQuery::ByEmail(entry.email.clone()));
//!     if let Some(Ok(Snapshot::Status { status, .. })) = status.next().await {
//!         println!("{} is {:?}", entry.email, status);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod store;
pub mod websocket;

// Re-export top-level types for convenience
pub use store::{
    EntryId, EntryStatus, LiveQuery, NewEntry, Snapshot, StoreConfig, StoreError, StoreResult,
    StoreStats, Subscription, WaitlistEntry, WaitlistStore,
};

pub use api::{build_router, serve, AdminCredentials, ApiConfig, ApiError, AppState};

pub use websocket::{
    websocket_handler, ClientMessage, ConnectionHub, HubConfig, HubError, ServerMessage, Topic,
};

pub use config::{
    generate_default_config, AdminConfig, ApiConfig as ConfigApiConfig, Config, ConfigError,
    LoggingConfig, RealtimeConfig, StorageConfig as ConfigStorageConfig,
};
