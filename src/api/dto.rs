//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::store::{EntryStatus, NewEntry, WaitlistEntry};

// ============================================
// WAITLIST DTOs
// ============================================

/// Signup form submission
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub reason: String,
}

impl From<CreateEntryRequest> for NewEntry {
    fn from(req: CreateEntryRequest) -> Self {
        NewEntry::new(req.name, req.email, req.reason)
    }
}

/// Query string of the status endpoint
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub email: String,
}

/// Status of the entry correlated with an email
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub email: String,
    /// `null` when no entry exists for the email
    pub status: Option<EntryStatus>,
}

// ============================================
// ADMIN DTOs
// ============================================

/// Admin login attempt
#[derive(Debug, Deserialize)]
pub struct AdminSessionRequest {
    pub code: String,
}

/// All entries, ordered by creation time
#[derive(Debug, Serialize, Deserialize)]
pub struct EntryListResponse {
    pub entries: Vec<WaitlistEntry>,
    pub total: usize,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// Store check result: "ok" or "error"
    pub store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<EntryCounts>,
    pub websocket_connections: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Entry counts by status
#[derive(Debug, Serialize)]
pub struct EntryCounts {
    pub total: u64,
    pub pending: u64,
    pub ready: u64,
}
