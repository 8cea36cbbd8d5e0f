//! WebSocket Connection Hub
//!
//! Manages all WebSocket connections and their topic subscriptions. Each
//! subscribed topic is backed by one store [`Subscription`] driven by a
//! forwarding task; unsubscribing or disconnecting aborts the task, which
//! drops the subscription.
//!
//! [`Subscription`]: crate::store::Subscription

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::messages::{ServerMessage, Topic};
use crate::store::{LiveQuery, WaitlistStore};

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

/// Configuration for the connection hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
        }
    }
}

/// Handle for sending messages to a specific connection
pub struct ConnectionHandle {
    /// Channel sender for this connection
    pub sender: mpsc::UnboundedSender<ServerMessage>,
    /// Forwarding task per subscribed topic
    watchers: HashMap<String, JoinHandle<()>>,
}

impl ConnectionHandle {
    fn stop_all(self) {
        for (_, task) in self.watchers {
            task.abort();
        }
    }
}

/// Result of a subscribe request
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SubscribeOutcome {
    /// Topics now active for the connection
    pub subscribed: Vec<String>,
    /// Topics refused because they need the admin code
    pub unauthorized: Vec<String>,
}

/// Manages all WebSocket connections and subscriptions
pub struct ConnectionHub {
    connections: RwLock<HashMap<ConnectionId, ConnectionHandle>>,
    store: Arc<WaitlistStore>,
    config: HubConfig,
}

impl ConnectionHub {
    pub fn new(config: HubConfig, store: Arc<WaitlistStore>) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            store,
            config,
        }
    }

    /// Register a new WebSocket connection
    ///
    /// Returns the connection ID on success, or an error if the connection
    /// limit has been reached.
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        let mut connections = self.connections.write().await;
        if connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        connections.insert(
            id.clone(),
            ConnectionHandle {
                sender,
                watchers: HashMap::new(),
            },
        );

        tracing::info!(connection_id = %id, "WebSocket connected");
        Ok(id)
    }

    /// Unregister a connection and stop all of its live queries
    pub async fn unregister(&self, id: &str) {
        if let Some(handle) = self.connections.write().await.remove(id) {
            handle.stop_all();
        }

        tracing::info!(connection_id = %id, "WebSocket disconnected");
    }

    /// Subscribe a connection to topics.
    ///
    /// Unknown topics are ignored. The `waitlist` topic is only accepted when
    /// `admin_authorized` is true.
    pub async fn subscribe(
        &self,
        id: &str,
        topics: Vec<String>,
        admin_authorized: bool,
    ) -> Result<SubscribeOutcome, HubError> {
        let mut connections = self.connections.write().await;
        let handle = connections
            .get_mut(id)
            .ok_or(HubError::ConnectionNotFound)?;

        let mut outcome = SubscribeOutcome::default();

        for raw in topics {
            let Some(topic) = Topic::parse(&raw) else {
                tracing::warn!(topic = %raw, "Invalid topic ignored");
                continue;
            };

            if topic.requires_admin() && !admin_authorized {
                tracing::warn!(connection_id = %id, topic = %raw, "Unauthorized topic refused");
                outcome.unauthorized.push(raw);
                continue;
            }

            if !handle.watchers.contains_key(&raw) {
                let query = match topic {
                    Topic::Waitlist => LiveQuery::All,
                    Topic::Entry(email) => LiveQuery::ByEmail(email),
                };
                let task = self.spawn_watcher(id, &raw, query, handle.sender.clone());
                handle.watchers.insert(raw.clone(), task);
            }

            outcome.subscribed.push(raw);
        }

        tracing::debug!(
            connection_id = %id,
            topics = ?outcome.subscribed,
            "Subscribed to topics"
        );

        Ok(outcome)
    }

    /// Unsubscribe a connection from topics
    pub async fn unsubscribe(
        &self,
        id: &str,
        topics: Vec<String>,
    ) -> Result<Vec<String>, HubError> {
        let mut connections = self.connections.write().await;
        let handle = connections
            .get_mut(id)
            .ok_or(HubError::ConnectionNotFound)?;

        let mut unsubscribed = Vec::new();
        for topic in topics {
            if let Some(task) = handle.watchers.remove(&topic) {
                task.abort();
                unsubscribed.push(topic);
            }
        }

        tracing::debug!(
            connection_id = %id,
            topics = ?unsubscribed,
            "Unsubscribed from topics"
        );

        Ok(unsubscribed)
    }

    /// Send a message directly to a specific connection
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let connections = self.connections.read().await;
        let handle = connections.get(id).ok_or(HubError::ConnectionNotFound)?;

        handle
            .sender
            .send(message)
            .map_err(|_| HubError::SendFailed)
    }

    /// Get the current connection count
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Number of connections subscribed to a topic
    pub async fn subscription_count(&self, topic: &str) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|handle| handle.watchers.contains_key(topic))
            .count()
    }

    /// Start the task that forwards a live query's snapshots to a connection
    fn spawn_watcher(
        &self,
        connection_id: &str,
        topic: &str,
        query: LiveQuery,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> JoinHandle<()> {
        // Created here so the listener is counted before the task first runs
        let mut subscription = self.store.watch(query);
        let connection_id = connection_id.to_string();
        let topic = topic.to_string();

        tokio::spawn(async move {
            while let Some(result) = subscription.next().await {
                let message = match result {
                    Ok(snapshot) => ServerMessage::from(snapshot),
                    Err(e) => {
                        tracing::error!(
                            connection_id = %connection_id,
                            topic = %topic,
                            error = %e,
                            "Live query failed"
                        );
                        ServerMessage::Error {
                            message: "Failed to load waitlist data".to_string(),
                        }
                    }
                };

                if sender.send(message).is_err() {
                    break;
                }
            }

            tracing::trace!(connection_id = %connection_id, topic = %topic, "Watcher finished");
        })
    }
}

/// Errors that can occur in the connection hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EntryStatus, NewEntry};
    use std::time::Duration;
    use tokio::time::timeout;

    fn hub() -> (ConnectionHub, Arc<WaitlistStore>) {
        let store = Arc::new(WaitlistStore::open_in_memory().unwrap());
        (
            ConnectionHub::new(HubConfig::default(), Arc::clone(&store)),
            store,
        )
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<ServerMessage>) -> ServerMessage {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out")
            .expect("channel closed")
    }

    async fn wait_for_listeners(store: &WaitlistStore, expected: usize) {
        timeout(Duration::from_secs(1), async {
            while store.active_listeners() != expected {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("listeners were not released");
    }

    #[test]
    fn test_default_config() {
        assert_eq!(HubConfig::default().max_connections, 1000);
    }

    #[tokio::test]
    async fn test_register_unregister() {
        let (hub, _store) = hub();
        let (tx, _rx) = mpsc::unbounded_channel();

        let id = hub.register(tx).await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(hub.connection_count().await, 1);

        hub.unregister(&id).await;
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let store = Arc::new(WaitlistStore::open_in_memory().unwrap());
        let hub = ConnectionHub::new(HubConfig { max_connections: 1 }, store);

        let (tx1, _) = mpsc::unbounded_channel();
        let (tx2, _) = mpsc::unbounded_channel();

        let id = hub.register(tx1).await.unwrap();
        let result = hub.register(tx2).await;
        assert!(matches!(result, Err(HubError::TooManyConnections(1))));

        hub.unregister(&id).await;
    }

    #[tokio::test]
    async fn test_entry_topic_streams_status() {
        let (hub, store) = hub();
        let entry = store
            .create(NewEntry::new("Ada", "a@x.com", "curious"))
            .await
            .unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        let outcome = hub
            .subscribe(&id, vec![Topic::entry("a@x.com")], false)
            .await
            .unwrap();
        assert_eq!(outcome.subscribed, vec!["entry.a@x.com"]);

        assert!(matches!(
            recv(&mut rx).await,
            ServerMessage::EntryStatus { status: Some(EntryStatus::Pending), .. }
        ));

        store.mark_ready(&entry.id).await.unwrap();
        assert!(matches!(
            recv(&mut rx).await,
            ServerMessage::EntryStatus { status: Some(EntryStatus::Ready), .. }
        ));

        hub.unregister(&id).await;
    }

    #[tokio::test]
    async fn test_waitlist_topic_requires_admin() {
        let (hub, store) = hub();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        let outcome = hub
            .subscribe(&id, vec!["waitlist".to_string(), "bogus".to_string()], false)
            .await
            .unwrap();
        assert!(outcome.subscribed.is_empty());
        assert_eq!(outcome.unauthorized, vec!["waitlist"]);
        assert_eq!(store.active_listeners(), 0);

        let outcome = hub
            .subscribe(&id, vec!["waitlist".to_string()], true)
            .await
            .unwrap();
        assert_eq!(outcome.subscribed, vec!["waitlist"]);
        assert_eq!(hub.subscription_count("waitlist").await, 1);

        hub.unregister(&id).await;
    }

    #[tokio::test]
    async fn test_duplicate_subscribe_keeps_single_watcher() {
        let (hub, store) = hub();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        hub.subscribe(&id, vec![Topic::entry("a@x.com")], false)
            .await
            .unwrap();
        hub.subscribe(&id, vec![Topic::entry("a@x.com")], false)
            .await
            .unwrap();
        assert_eq!(store.active_listeners(), 1);

        hub.unregister(&id).await;
    }

    #[tokio::test]
    async fn test_unsubscribe_and_disconnect_release_live_queries() {
        let (hub, store) = hub();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        hub.subscribe(
            &id,
            vec![Topic::entry("a@x.com"), "waitlist".to_string()],
            true,
        )
        .await
        .unwrap();
        assert_eq!(store.active_listeners(), 2);

        let removed = hub
            .unsubscribe(&id, vec![Topic::entry("a@x.com")])
            .await
            .unwrap();
        assert_eq!(removed, vec!["entry.a@x.com"]);
        wait_for_listeners(&store, 1).await;

        hub.unregister(&id).await;
        wait_for_listeners(&store, 0).await;
    }

    #[tokio::test]
    async fn test_subscribe_unknown_connection() {
        let (hub, _store) = hub();
        let result = hub.subscribe("nope", vec!["waitlist".to_string()], true).await;
        assert!(matches!(result, Err(HubError::ConnectionNotFound)));
    }
}
