//! Global Application State
//!
//! Reactive state shared by every view, plus the waitlist types received
//! from the API.

use chrono::{DateTime, Utc};
use leptos::*;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Whether a live query socket is currently open
    pub ws_connected: RwSignal<bool>,
    /// Transient notice shown in the corner
    pub notices: RwSignal<NoticeBoard>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

impl NoticeKind {
    pub fn icon(&self) -> &'static str {
        match self {
            NoticeKind::Success => "✓",
            NoticeKind::Failure => "✕",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            NoticeKind::Success => "bg-green-600",
            NoticeKind::Failure => "bg-red-600",
        }
    }

    /// Milliseconds before the notice hides itself
    pub fn lifetime_ms(&self) -> u32 {
        match self {
            NoticeKind::Success => 3000,
            NoticeKind::Failure => 5000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
}

/// At most one notice is visible; posting replaces the current one
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeBoard {
    current: Option<Notice>,
    next_id: u64,
}

impl NoticeBoard {
    /// Show a notice, returning its id for a later `expire`
    pub fn post(&mut self, kind: NoticeKind, text: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.current = Some(Notice {
            id: self.next_id,
            kind,
            text: text.into(),
        });
        self.next_id
    }

    /// Hide notice `id` if it is still the one showing
    pub fn expire(&mut self, id: u64) {
        if self.current.as_ref().is_some_and(|n| n.id == id) {
            self.current = None;
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}

/// Status of a waitlist entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Ready,
}

impl EntryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "Pending",
            EntryStatus::Ready => "Ready",
        }
    }
}

/// One waitlist entry as served by the API
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub reason: String,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        ws_connected: create_rw_signal(false),
        notices: create_rw_signal(NoticeBoard::default()),
    };

    provide_context(state);
}

impl GlobalState {
    pub fn show_success(&self, message: &str) {
        self.notify(NoticeKind::Success, message);
    }

    pub fn show_error(&self, message: &str) {
        self.notify(NoticeKind::Failure, message);
    }

    fn notify(&self, kind: NoticeKind, message: &str) {
        let mut id = 0;
        self.notices.update(|board| id = board.post(kind, message));

        let notices = self.notices;
        gloo_timers::callback::Timeout::new(kind.lifetime_ms(), move || {
            notices.update(|board| board.expire(id));
        })
        .forget();
    }
}

/// Blocking browser alert, used where the visitor must acknowledge a failure
pub fn alert(message: &str) {
    web_sys::console::error_1(&message.into());
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_wire_format() {
        let json = r#"{
            "id": "7f9c",
            "name": "Ada",
            "email": "a@x.com",
            "reason": "curious",
            "status": "ready",
            "createdAt": "2026-03-01T12:00:00Z"
        }"#;

        let entry: WaitlistEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.status, EntryStatus::Ready);
        assert_eq!(entry.created_at.to_rfc3339(), "2026-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_newer_notice_outlives_older_timer() {
        let mut board = NoticeBoard::default();
        let saved = board.post(NoticeKind::Success, "You're on the waitlist!");
        let failed = board.post(NoticeKind::Failure, "Failed to update the entry");
        assert_ne!(saved, failed);

        board.expire(saved);
        assert_eq!(board.current().map(|n| n.kind), Some(NoticeKind::Failure));

        board.expire(failed);
        assert!(board.current().is_none());
    }

    #[test]
    fn test_dismiss_notice() {
        let mut board = NoticeBoard::default();
        board.post(NoticeKind::Success, "Entry removed");
        board.dismiss();
        assert!(board.current().is_none());
        assert!(NoticeKind::Failure.lifetime_ms() > NoticeKind::Success.lifetime_ms());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(EntryStatus::Pending.label(), "Pending");
        assert_eq!(EntryStatus::Ready.label(), "Ready");
    }
}
