//! Live Queries
//!
//! A [`Subscription`] is a standing query against the waitlist collection. It
//! yields the current result set once, then again after every change that
//! could affect it. Dropping the subscription releases its broadcast receiver
//! and decrements the store's listener count.

use crate::store::collection::WaitlistStore;
use crate::store::error::StoreResult;
use crate::store::types::{EntryStatus, StoreChange, WaitlistEntry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};

/// What a subscription watches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveQuery {
    /// Status of the entry correlated with an email
    ByEmail(String),
    /// The whole collection ordered by creation time
    All,
}

impl LiveQuery {
    /// Whether a change can alter this query's result
    pub fn is_affected_by(&self, change: &StoreChange) -> bool {
        match self {
            LiveQuery::ByEmail(email) => change.email == *email,
            LiveQuery::All => true,
        }
    }
}

/// One delivery of a live query's result set
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// `status` is `None` when no entry matches the email
    Status {
        email: String,
        status: Option<EntryStatus>,
    },
    Entries(Vec<WaitlistEntry>),
}

/// Counts a live subscription for as long as it exists
pub struct ListenerGuard {
    counter: Arc<AtomicUsize>,
}

impl ListenerGuard {
    pub(crate) fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Handle to a continuous query
pub struct Subscription {
    store: Arc<WaitlistStore>,
    query: LiveQuery,
    changes: broadcast::Receiver<StoreChange>,
    primed: bool,
    _guard: ListenerGuard,
}

impl Subscription {
    pub(crate) fn new(store: Arc<WaitlistStore>, query: LiveQuery) -> Self {
        // Subscribe before the first read so no change between the two is lost
        let changes = store.change_receiver();
        let guard = store.listener_guard();

        Self {
            store,
            query,
            changes,
            primed: false,
            _guard: guard,
        }
    }

    pub fn query(&self) -> &LiveQuery {
        &self.query
    }

    /// Wait for the next result set.
    ///
    /// The handle owns an `Arc` of the store, and the store owns the sending
    /// half of the change channel, so this never returns `None` while the
    /// handle exists. The `Option` lets callers drive it with `while let`.
    pub async fn next(&mut self) -> Option<StoreResult<Snapshot>> {
        if !self.primed {
            self.primed = true;
            return Some(self.snapshot().await);
        }

        loop {
            match self.changes.recv().await {
                Ok(change) if self.query.is_affected_by(&change) => {
                    return Some(self.snapshot().await);
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, query = ?self.query, "Live query lagged, resyncing");
                    return Some(self.snapshot().await);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Run the query now
    pub async fn snapshot(&self) -> StoreResult<Snapshot> {
        match &self.query {
            LiveQuery::ByEmail(email) => {
                let status = self
                    .store
                    .correlated(email)
                    .await?
                    .map(|entry| entry.status);
                Ok(Snapshot::Status {
                    email: email.clone(),
                    status,
                })
            }
            LiveQuery::All => Ok(Snapshot::Entries(self.store.list().await?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{ChangeKind, EntryId, NewEntry};
    use std::time::Duration;
    use tokio::time::timeout;

    fn store() -> Arc<WaitlistStore> {
        Arc::new(WaitlistStore::open_in_memory().unwrap())
    }

    async fn next_snapshot(sub: &mut Subscription) -> Snapshot {
        timeout(Duration::from_secs(1), sub.next())
            .await
            .expect("timed out waiting for snapshot")
            .expect("channel closed")
            .expect("query failed")
    }

    #[test]
    fn test_query_relevance() {
        let change = StoreChange {
            kind: ChangeKind::Created,
            id: EntryId::from("1"),
            email: "a@x.com".to_string(),
        };
        assert!(LiveQuery::All.is_affected_by(&change));
        assert!(LiveQuery::ByEmail("a@x.com".to_string()).is_affected_by(&change));
        assert!(!LiveQuery::ByEmail("b@x.com".to_string()).is_affected_by(&change));
    }

    #[tokio::test]
    async fn test_first_next_yields_current_state() {
        let store = store();
        store
            .create(NewEntry::new("Ada", "a@x.com", "curious"))
            .await
            .unwrap();

        let mut sub = store.watch(LiveQuery::ByEmail("a@x.com".to_string()));
        assert_eq!(
            next_snapshot(&mut sub).await,
            Snapshot::Status {
                email: "a@x.com".to_string(),
                status: Some(EntryStatus::Pending),
            }
        );
    }

    #[tokio::test]
    async fn test_email_subscription_follows_status_and_deletion() {
        let store = store();
        let entry = store
            .create(NewEntry::new("Ada", "a@x.com", "curious"))
            .await
            .unwrap();
        let mut sub = store.watch(LiveQuery::ByEmail("a@x.com".to_string()));
        next_snapshot(&mut sub).await;

        // Unrelated traffic is filtered out
        store
            .create(NewEntry::new("Bob", "b@x.com", ""))
            .await
            .unwrap();
        store.mark_ready(&entry.id).await.unwrap();
        assert_eq!(
            next_snapshot(&mut sub).await,
            Snapshot::Status {
                email: "a@x.com".to_string(),
                status: Some(EntryStatus::Ready),
            }
        );

        store.delete(&entry.id).await.unwrap();
        assert_eq!(
            next_snapshot(&mut sub).await,
            Snapshot::Status {
                email: "a@x.com".to_string(),
                status: None,
            }
        );
    }

    #[tokio::test]
    async fn test_all_subscription_redelivers_full_collection() {
        let store = store();
        let mut sub = store.watch(LiveQuery::All);
        assert_eq!(next_snapshot(&mut sub).await, Snapshot::Entries(vec![]));

        let a = store.create(NewEntry::new("Ada", "a@x.com", "")).await.unwrap();
        match next_snapshot(&mut sub).await {
            Snapshot::Entries(entries) => assert_eq!(entries, vec![a.clone()]),
            other => panic!("Expected entries, got {:?}", other),
        }

        store.delete(&a.id).await.unwrap();
        assert_eq!(next_snapshot(&mut sub).await, Snapshot::Entries(vec![]));
    }

    #[tokio::test]
    async fn test_drop_releases_listener() {
        let store = store();
        assert_eq!(store.active_listeners(), 0);

        let first = store.watch(LiveQuery::All);
        let second = store.watch(LiveQuery::ByEmail("a@x.com".to_string()));
        assert_eq!(store.active_listeners(), 2);

        drop(first);
        assert_eq!(store.active_listeners(), 1);
        drop(second);
        assert_eq!(store.active_listeners(), 0);
    }
}
