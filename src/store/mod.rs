//! Waitlist Store
//!
//! The `waitlist` collection and its change notifications:
//!
//! - **types**: `WaitlistEntry`, `NewEntry`, `EntryStatus`, `StoreChange`
//! - **collection**: SQLite-backed `WaitlistStore` with the create / list /
//!   find / mark-ready / delete operations
//! - **live**: continuous queries (`Subscription`) over the collection
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Mutation:
//!   create / mark_ready / delete → SQLite → StoreChange (broadcast)
//!
//! Live query:
//!   StoreChange → relevant? → re-run query → Snapshot
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use stellar_forge::store::{LiveQuery, NewEntry, StoreConfig, WaitlistStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(WaitlistStore::open(&StoreConfig::new("./data"))?);
//!
//!     let mut status = store.watch(LiveQuery::ByEmail("a@x.com".to_string()));
//!     let entry = store.create(NewEntry::new("Ada", "a@x.com", "curious")).await?;
//!     store.mark_ready(&entry.id).await?;
//!
//!     while let Some(snapshot) = status.next().await {
//!         println!("{:?}", snapshot?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod collection;
pub mod error;
pub mod live;
pub mod types;

pub use collection::{StoreConfig, StoreStats, WaitlistStore};
pub use error::{StoreError, StoreResult};
pub use live::{LiveQuery, Snapshot, Subscription};
pub use types::{
    ChangeKind, EntryId, EntryStatus, NewEntry, StoreChange, WaitlistEntry, MAX_EMAIL_LEN,
    MAX_NAME_LEN, MAX_REASON_LEN,
};
