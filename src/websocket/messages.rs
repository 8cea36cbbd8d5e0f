//! WebSocket Message Types
//!
//! Defines all message types for WebSocket communication between
//! browser clients (landing page, admin dashboard) and the server.

use serde::{Deserialize, Serialize};

use crate::store::{EntryStatus, Snapshot, WaitlistEntry};

/// Topic carrying the whole collection (admin only)
pub const WAITLIST_TOPIC: &str = "waitlist";
/// Prefix of per-email status topics (`entry.<email>`)
pub const ENTRY_TOPIC_PREFIX: &str = "entry.";

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to topics for live updates
    Subscribe {
        /// Topics to subscribe to (`waitlist`, `entry.<email>`)
        topics: Vec<String>,
        /// Admin code, required for the `waitlist` topic
        #[serde(default)]
        admin_code: Option<String>,
    },
    /// Unsubscribe from topics
    Unsubscribe {
        topics: Vec<String>,
    },
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Current status of the entry correlated with an email
    EntryStatus {
        email: String,
        /// `null` when no entry matches
        status: Option<EntryStatus>,
    },
    /// Full collection ordered by creation time
    Entries { entries: Vec<WaitlistEntry> },
    /// Subscription confirmed
    Subscribed { topics: Vec<String> },
    /// Unsubscription confirmed
    Unsubscribed { topics: Vec<String> },
    /// Pong response to ping
    Pong,
    /// Error message
    Error { message: String },
    /// Connection established
    Connected { connection_id: String },
}

impl From<Snapshot> for ServerMessage {
    fn from(snapshot: Snapshot) -> Self {
        match snapshot {
            Snapshot::Status { email, status } => ServerMessage::EntryStatus { email, status },
            Snapshot::Entries(entries) => ServerMessage::Entries { entries },
        }
    }
}

/// A parsed subscription topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    Waitlist,
    Entry(String),
}

impl Topic {
    /// Parse a topic string; `None` for anything unrecognised
    pub fn parse(topic: &str) -> Option<Self> {
        if topic == WAITLIST_TOPIC {
            return Some(Topic::Waitlist);
        }
        match topic.strip_prefix(ENTRY_TOPIC_PREFIX) {
            Some(email) if !email.trim().is_empty() => Some(Topic::Entry(email.to_string())),
            _ => None,
        }
    }

    /// Topic string for an email's status
    pub fn entry(email: &str) -> String {
        format!("{}{}", ENTRY_TOPIC_PREFIX, email)
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Topic::Waitlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize_subscribe() {
        let json = r#"{"type": "subscribe", "topics": ["entry.a@x.com"]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Subscribe { topics, admin_code } => {
                assert_eq!(topics, vec!["entry.a@x.com"]);
                assert!(admin_code.is_none());
            }
            _ => panic!("Expected Subscribe"),
        }
    }

    #[test]
    fn test_client_message_deserialize_admin_subscribe() {
        let json = r#"{"type": "subscribe", "topics": ["waitlist"], "admin_code": "hunter2"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Subscribe { admin_code: Some(ref code), .. } if code == "hunter2"
        ));
    }

    #[test]
    fn test_client_message_deserialize_ping() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_server_message_serialize_missing_status() {
        let msg = ServerMessage::EntryStatus {
            email: "a@x.com".to_string(),
            status: None,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"entry_status","email":"a@x.com","status":null}"#
        );
    }

    #[test]
    fn test_server_message_serialize_ready_status() {
        let msg = ServerMessage::from(Snapshot::Status {
            email: "a@x.com".to_string(),
            status: Some(EntryStatus::Ready),
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"status\":\"ready\""));
    }

    #[test]
    fn test_topic_parse() {
        assert_eq!(Topic::parse("waitlist"), Some(Topic::Waitlist));
        assert_eq!(
            Topic::parse("entry.a.b@x.com"),
            Some(Topic::Entry("a.b@x.com".to_string()))
        );
        assert_eq!(Topic::parse("entry."), None);
        assert_eq!(Topic::parse("metrics.mood"), None);
        assert_eq!(Topic::parse(""), None);
        assert_eq!(Topic::entry("a@x.com"), "entry.a@x.com");
        assert!(Topic::Waitlist.requires_admin());
        assert!(!Topic::Entry("a@x.com".to_string()).requires_admin());
    }
}
