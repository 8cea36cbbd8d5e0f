//! State Management
//!
//! Global signals, view transitions, the local identity cache and live
//! queries.

pub mod global;
pub mod identity;
pub mod live;
pub mod view;

pub use global::{alert, provide_global_state, EntryStatus, GlobalState, WaitlistEntry};
pub use identity::{IdentityStore, LocalIdentity};
pub use live::{LiveQuery, WsMessage};
pub use view::{AdminBoard, AdminGate, Route, View, VisitorEvent};
