//! Core data types for the waitlist collection
//!
//! - `WaitlistEntry`: One user's request for access
//! - `NewEntry`: The user-supplied part of an entry, before the store assigns
//!   id, status and creation time
//! - `EntryStatus`: Approval state (`pending` → `ready`)
//! - `StoreChange`: Change notification published after every mutation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::store::error::StoreError;

/// Maximum length of the name field (characters)
pub const MAX_NAME_LEN: usize = 200;
/// Maximum length of the email field (characters)
pub const MAX_EMAIL_LEN: usize = 320;
/// Maximum length of the reason field (characters)
pub const MAX_REASON_LEN: usize = 2000;

/// Opaque entry identifier assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Approval status of a waitlist entry
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Waiting for an admin to let the user in
    #[default]
    Pending,
    /// Access granted; the download link is revealed
    Ready,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Ready => "ready",
        }
    }

    pub fn all() -> &'static [EntryStatus] {
        &[EntryStatus::Pending, EntryStatus::Ready]
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EntryStatus::Pending),
            "ready" => Ok(EntryStatus::Ready),
            other => Err(StoreError::Corruption(format!(
                "unknown entry status '{}'",
                other
            ))),
        }
    }
}

/// A document in the `waitlist` collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: EntryId,
    pub name: String,
    pub email: String,
    pub reason: String,
    pub status: EntryStatus,
    /// Server clock at creation time
    pub created_at: DateTime<Utc>,
}

/// User-supplied fields of a new entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEntry {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub reason: String,
}

impl NewEntry {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            reason: reason.into(),
        }
    }

    /// Trim all fields and check presence and length limits.
    ///
    /// Only presence is required; no format checks are applied to the email.
    pub fn normalized(self) -> Result<Self, StoreError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        let reason = self.reason.trim().to_string();

        if name.is_empty() {
            return Err(StoreError::Validation("name is required".to_string()));
        }
        if email.is_empty() {
            return Err(StoreError::Validation("email is required".to_string()));
        }
        check_len("name", &name, MAX_NAME_LEN)?;
        check_len("email", &email, MAX_EMAIL_LEN)?;
        check_len("reason", &reason, MAX_REASON_LEN)?;

        Ok(Self {
            name,
            email,
            reason,
        })
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), StoreError> {
    if value.chars().count() > max {
        return Err(StoreError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Kind of mutation that produced a change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// Published on the store's broadcast channel after every mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub kind: ChangeKind,
    pub id: EntryId,
    /// Email of the affected entry, used to route per-email notifications
    pub email: String,
}
