//! View State
//!
//! Which screen is showing, as one tagged union, plus the admin gate and
//! dashboard board. Everything here is plain data so the transitions can be
//! tested natively.

use super::global::{EntryStatus, WaitlistEntry};
use super::identity::IdentityStore;

/// Route selected by the URL fragment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Landing,
    Admin,
}

impl Route {
    /// `#admin` selects the dashboard; anything else is the landing page
    pub fn from_fragment(fragment: &str) -> Self {
        match fragment.strip_prefix('#').unwrap_or(fragment) {
            "admin" => Route::Admin,
            _ => Route::Landing,
        }
    }
}

/// The screen currently shown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    /// Marketing page with the "join" call to action
    Landing,
    /// Signup form open
    Form,
    /// Submitted, waiting for an admin
    Pending,
    /// Access granted, download link shown
    Ready,
    AdminLogin,
    AdminDashboard,
}

/// Things that move the visitor side of the site
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitorEvent {
    OpenForm,
    CloseForm,
    Submitted,
    /// Live status of the cached email; `None` when no entry matches
    Status(Option<EntryStatus>),
}

/// Side effect requested by a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The cached email no longer matches an entry; forget it
    ForgetIdentity,
}

impl View {
    /// Starting visitor view: a cached email means a submission is on record
    pub fn initial(has_identity: bool) -> Self {
        if has_identity {
            View::Pending
        } else {
            View::Landing
        }
    }

    /// The view to render for a route
    pub fn resolve(route: Route, gate: &AdminGate, visitor: View) -> View {
        match route {
            Route::Admin if gate.is_unlocked() => View::AdminDashboard,
            Route::Admin => View::AdminLogin,
            Route::Landing => visitor,
        }
    }

    /// Whether a status subscription should be open in this view
    pub fn tracks_status(&self) -> bool {
        matches!(self, View::Pending | View::Ready)
    }

    /// Apply a visitor event.
    ///
    /// Status notifications only matter while a submission is tracked; a
    /// `None` status resets to the landing page once and asks for the cached
    /// email to be forgotten.
    pub fn step(self, event: VisitorEvent) -> (View, Effect) {
        match (self, event) {
            (View::Landing, VisitorEvent::OpenForm) => (View::Form, Effect::None),
            (View::Form, VisitorEvent::CloseForm) => (View::Landing, Effect::None),
            (View::Form, VisitorEvent::Submitted) => (View::Pending, Effect::None),
            (current, VisitorEvent::Status(status)) if current.tracks_status() => match status {
                Some(EntryStatus::Pending) => (View::Pending, Effect::None),
                Some(EntryStatus::Ready) => (View::Ready, Effect::None),
                None => (View::Landing, Effect::ForgetIdentity),
            },
            (current, _) => (current, Effect::None),
        }
    }

    /// The server accepted a signup: cache its email and show the
    /// submitted view.
    pub fn on_submitted(self, identity: &impl IdentityStore, email: &str) -> View {
        identity.save(email);
        self.step(VisitorEvent::Submitted).0
    }

    /// Apply a live status notification for the cached email
    pub fn on_status(self, identity: &impl IdentityStore, status: Option<EntryStatus>) -> View {
        let (next, effect) = self.step(VisitorEvent::Status(status));
        if effect == Effect::ForgetIdentity {
            identity.clear();
        }
        next
    }
}

/// Admin access for this page load. Once unlocked it stays unlocked until
/// reload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AdminGate {
    #[default]
    Locked,
    Unlocked { code: String },
}

impl AdminGate {
    /// Record a code the server accepted
    pub fn unlock(&mut self, code: impl Into<String>) {
        if let AdminGate::Locked = self {
            *self = AdminGate::Unlocked { code: code.into() };
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self, AdminGate::Unlocked { .. })
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            AdminGate::Unlocked { code } => Some(code),
            AdminGate::Locked => None,
        }
    }
}

/// Dashboard table state: latest snapshot, detail selection and a pending
/// removal awaiting confirmation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdminBoard {
    pub entries: Vec<WaitlistEntry>,
    selected: Option<String>,
    pending_removal: Option<String>,
}

impl AdminBoard {
    /// Replace the table with a fresh snapshot. Selections pointing at
    /// entries that no longer exist are dropped.
    pub fn apply_snapshot(&mut self, entries: Vec<WaitlistEntry>) {
        let exists = |id: &Option<String>| {
            id.as_ref()
                .map(|id| entries.iter().any(|e| &e.id == id))
                .unwrap_or(false)
        };

        if !exists(&self.selected) {
            self.selected = None;
        }
        if !exists(&self.pending_removal) {
            self.pending_removal = None;
        }
        self.entries = entries;
    }

    pub fn select(&mut self, id: &str) {
        if self.entries.iter().any(|e| e.id == id) {
            self.selected = Some(id.to_string());
        }
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    pub fn selected_entry(&self) -> Option<&WaitlistEntry> {
        let id = self.selected.as_ref()?;
        self.entries.iter().find(|e| &e.id == id)
    }

    /// First step of a removal; nothing is deleted yet
    pub fn request_removal(&mut self, id: &str) {
        if self.entries.iter().any(|e| e.id == id) {
            self.pending_removal = Some(id.to_string());
        }
    }

    pub fn pending_removal(&self) -> Option<&WaitlistEntry> {
        let id = self.pending_removal.as_ref()?;
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Confirm the requested removal, returning the id to delete
    pub fn confirm_removal(&mut self) -> Option<String> {
        self.pending_removal.take()
    }

    pub fn cancel_removal(&mut self) {
        self.pending_removal = None;
    }

    /// (pending, ready) counts for the header
    pub fn counts(&self) -> (usize, usize) {
        let ready = self
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Ready)
            .count();
        (self.entries.len() - ready, ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::identity::MemoryIdentity;
    use chrono::{TimeZone, Utc};

    fn entry(id: &str, status: EntryStatus) -> WaitlistEntry {
        WaitlistEntry {
            id: id.to_string(),
            name: "Ada".to_string(),
            email: format!("{}@x.com", id),
            reason: "curious".to_string(),
            status,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_route_from_fragment() {
        assert_eq!(Route::from_fragment("#admin"), Route::Admin);
        assert_eq!(Route::from_fragment("admin"), Route::Admin);
        assert_eq!(Route::from_fragment(""), Route::Landing);
        assert_eq!(Route::from_fragment("#features"), Route::Landing);
        assert_eq!(Route::from_fragment("#admin/extra"), Route::Landing);
    }

    #[test]
    fn test_resolve_respects_gate() {
        let mut gate = AdminGate::default();
        assert_eq!(View::resolve(Route::Admin, &gate, View::Ready), View::AdminLogin);

        gate.unlock("forge");
        assert_eq!(
            View::resolve(Route::Admin, &gate, View::Ready),
            View::AdminDashboard
        );
        assert_eq!(View::resolve(Route::Landing, &gate, View::Ready), View::Ready);
    }

    #[test]
    fn test_signup_then_ready() {
        let view = View::initial(false);
        let (view, _) = view.step(VisitorEvent::OpenForm);
        assert_eq!(view, View::Form);

        let (view, _) = view.step(VisitorEvent::Submitted);
        assert_eq!(view, View::Pending);

        let (view, effect) = view.step(VisitorEvent::Status(Some(EntryStatus::Pending)));
        assert_eq!((view, effect), (View::Pending, Effect::None));

        let (view, _) = view.step(VisitorEvent::Status(Some(EntryStatus::Ready)));
        assert_eq!(view, View::Ready);
    }

    #[test]
    fn test_stale_identity_resets_once() {
        let view = View::initial(true);
        assert_eq!(view, View::Pending);

        let (view, effect) = view.step(VisitorEvent::Status(None));
        assert_eq!((view, effect), (View::Landing, Effect::ForgetIdentity));

        let (view, effect) = view.step(VisitorEvent::Status(None));
        assert_eq!((view, effect), (View::Landing, Effect::None));
    }

    #[test]
    fn test_submission_caches_email() {
        let identity = MemoryIdentity::default();
        let view = View::Form.on_submitted(&identity, "a@x.com");

        assert_eq!(view, View::Pending);
        assert_eq!(identity.load(), Some("a@x.com".to_string()));
        assert!(View::initial(identity.load().is_some()).tracks_status());
    }

    #[test]
    fn test_stale_identity_forgotten_once() {
        let identity = MemoryIdentity::default();
        identity.save("a@x.com");
        let view = View::initial(identity.load().is_some());

        let view = view.on_status(&identity, None);
        assert_eq!(view, View::Landing);
        assert_eq!(identity.load(), None);
        assert_eq!(identity.clear_count(), 1);

        let view = view.on_status(&identity, None);
        assert_eq!(view, View::Landing);
        assert_eq!(identity.clear_count(), 1);
    }

    #[test]
    fn test_live_status_keeps_identity() {
        let identity = MemoryIdentity::default();
        let view = View::Form.on_submitted(&identity, "a@x.com");

        let view = view.on_status(&identity, Some(EntryStatus::Pending));
        let view = view.on_status(&identity, Some(EntryStatus::Ready));
        assert_eq!(view, View::Ready);
        assert_eq!(identity.load(), Some("a@x.com".to_string()));
        assert_eq!(identity.clear_count(), 0);
    }

    #[test]
    fn test_status_ignored_without_submission() {
        let (view, effect) = View::Form.step(VisitorEvent::Status(Some(EntryStatus::Ready)));
        assert_eq!((view, effect), (View::Form, Effect::None));
    }

    #[test]
    fn test_gate_is_one_way() {
        let mut gate = AdminGate::default();
        assert_eq!(gate.code(), None);

        gate.unlock("first");
        gate.unlock("second");
        assert_eq!(gate.code(), Some("first"));
    }

    #[test]
    fn test_removal_needs_confirmation() {
        let mut board = AdminBoard::default();
        board.apply_snapshot(vec![entry("a", EntryStatus::Pending)]);

        board.request_removal("a");
        assert_eq!(board.pending_removal().map(|e| e.id.as_str()), Some("a"));

        board.cancel_removal();
        assert_eq!(board.confirm_removal(), None);

        board.request_removal("a");
        assert_eq!(board.confirm_removal(), Some("a".to_string()));
        assert!(board.pending_removal().is_none());
    }

    #[test]
    fn test_snapshot_clears_vanished_selection() {
        let mut board = AdminBoard::default();
        board.apply_snapshot(vec![
            entry("a", EntryStatus::Pending),
            entry("b", EntryStatus::Ready),
        ]);
        board.select("a");
        board.request_removal("a");
        assert_eq!(board.counts(), (1, 1));

        board.apply_snapshot(vec![entry("b", EntryStatus::Ready)]);
        assert!(board.selected_entry().is_none());
        assert!(board.pending_removal().is_none());

        board.select("b");
        board.apply_snapshot(vec![entry("b", EntryStatus::Ready)]);
        assert_eq!(board.selected_entry().map(|e| e.id.as_str()), Some("b"));

        board.close_details();
        assert!(board.selected_entry().is_none());
    }

    #[test]
    fn test_select_unknown_id_ignored() {
        let mut board = AdminBoard::default();
        board.select("missing");
        board.request_removal("missing");
        assert!(board.selected_entry().is_none());
        assert!(board.pending_removal().is_none());
    }
}
