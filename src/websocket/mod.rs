//! WebSocket Live Queries
//!
//! Pushes waitlist changes to browser clients as they happen.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: Tracks connections and one live query task per
//!   subscribed topic
//! - **Handler**: Handles WebSocket upgrade and message processing
//! - **Messages**: Defines client and server message formats
//!
//! ## Topics
//!
//! - `entry.{email}` - Status of the entry correlated with an email
//! - `waitlist` - The whole collection, ordered by creation (admin code required)
//!
//! Every subscription immediately receives the current result, then a fresh
//! result after each relevant change.
//!
//! ## Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8090/api/v1/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'subscribe', topics: ['entry.a@x.com']}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'entry_status') console.log(msg.status);
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{ConnectionHub, HubConfig, HubError, SubscribeOutcome};
pub use messages::{ClientMessage, ServerMessage, Topic, ENTRY_TOPIC_PREFIX, WAITLIST_TOPIC};
