//! Live Queries
//!
//! WebSocket-backed continuous queries against the waitlist. One socket per
//! query; dropping the handle closes the socket and releases its handlers,
//! which in turn stops the server-side subscription.

use leptos::*;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::global::{EntryStatus, GlobalState, WaitlistEntry};

/// WebSocket message types from server
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    Connected {
        connection_id: String,
    },
    EntryStatus {
        email: String,
        status: Option<EntryStatus>,
    },
    Entries {
        entries: Vec<WaitlistEntry>,
    },
    Subscribed {
        topics: Vec<String>,
    },
    Unsubscribed {
        topics: Vec<String>,
    },
    Pong,
    Error {
        message: String,
    },
}

/// WebSocket client message types
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe {
        topics: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        admin_code: Option<String>,
    },
}

/// Topic for the status of one email
pub fn entry_topic(email: &str) -> String {
    format!("entry.{}", email)
}

/// Topic carrying the whole collection
pub const WAITLIST_TOPIC: &str = "waitlist";

/// Convert the HTTP API base (`.../api/v1`) to the socket URL
pub fn ws_url(api_base: &str) -> String {
    let base = api_base
        .trim_end_matches('/')
        .replacen("https://", "wss://", 1)
        .replacen("http://", "ws://", 1);
    format!("{}/ws", base)
}

fn connection_changed(state: &GlobalState, open: bool) {
    state.ws_connected.set(open);
}

/// Handle to one open live query
pub struct LiveQuery {
    ws: WebSocket,
    _on_open: Closure<dyn FnMut(JsValue)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

impl LiveQuery {
    /// Open a socket and subscribe to `topic`. Every server message is passed
    /// to `on_message`; no reconnect is attempted after a close.
    pub fn open<F>(
        api_base: &str,
        topic: String,
        admin_code: Option<String>,
        state: GlobalState,
        on_message: F,
    ) -> Result<Self, String>
    where
        F: Fn(WsMessage) + 'static,
    {
        let ws = WebSocket::new(&ws_url(api_base))
            .map_err(|e| format!("WebSocket connection failed: {:?}", e))?;

        let subscribe = serde_json::to_string(&ClientMessage::Subscribe {
            topics: vec![topic.clone()],
            admin_code,
        })
        .map_err(|e| e.to_string())?;

        // On open
        let ws_for_open = ws.clone();
        let state_for_open = state.clone();
        let on_open = Closure::wrap(Box::new(move |_: JsValue| {
            connection_changed(&state_for_open, true);
            if let Err(e) = ws_for_open.send_with_str(&subscribe) {
                web_sys::console::error_1(&format!("Subscribe failed: {:?}", e).into());
            }
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        // On message
        let on_message = Rc::new(on_message);
        let state_for_message = state.clone();
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            let Ok(text) = event.data().dyn_into::<js_sys::JsString>() else {
                return;
            };
            let text: String = text.into();
            match serde_json::from_str::<WsMessage>(&text) {
                Ok(WsMessage::Connected { connection_id }) => {
                    web_sys::console::log_1(&format!("Connected with ID: {}", connection_id).into());
                }
                Ok(WsMessage::Subscribed { topics }) => {
                    web_sys::console::log_1(&format!("Subscribed to: {:?}", topics).into());
                }
                Ok(WsMessage::Unsubscribed { topics }) => {
                    web_sys::console::log_1(&format!("Unsubscribed from: {:?}", topics).into());
                }
                Ok(WsMessage::Pong) => {}
                Ok(WsMessage::Error { message }) => {
                    web_sys::console::error_1(&format!("Server error: {}", message).into());
                    state_for_message.show_error(&message);
                }
                Ok(msg) => on_message(msg),
                Err(e) => {
                    web_sys::console::error_1(
                        &format!("Failed to parse WebSocket message: {}", e).into(),
                    );
                }
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        // On close
        let state_for_close = state;
        let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
            web_sys::console::log_1(
                &format!("Live query closed: code={}, topic={}", event.code(), topic).into(),
            );
            connection_changed(&state_for_close, false);
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        // On error
        let on_error = Closure::wrap(Box::new(move |e: JsValue| {
            web_sys::console::error_1(&format!("WebSocket error: {:?}", e).into());
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        Ok(Self {
            ws,
            _on_open: on_open,
            _on_message: on_message,
            _on_close: on_close,
            _on_error: on_error,
        })
    }

    /// Drop on the next tick. Use this when the release may be triggered
    /// from inside one of this socket's own handlers.
    pub fn release(self) {
        gloo_timers::callback::Timeout::new(0, move || drop(self)).forget();
    }
}

impl Drop for LiveQuery {
    fn drop(&mut self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onclose(None);
        self.ws.set_onerror(None);
        let _ = self.ws.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::global::NoticeBoard;

    #[test]
    fn test_ws_url() {
        assert_eq!(
            ws_url("http://localhost:8090/api/v1"),
            "ws://localhost:8090/api/v1/ws"
        );
        assert_eq!(
            ws_url("https://forge.example/api/v1/"),
            "wss://forge.example/api/v1/ws"
        );
    }

    #[test]
    fn test_subscribe_message_shape() {
        let msg = ClientMessage::Subscribe {
            topics: vec![entry_topic("a@x.com")],
            admin_code: None,
        };
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"type":"subscribe","topics":["entry.a@x.com"]}"#
        );
    }

    #[test]
    fn test_connection_flag_follows_socket() {
        let runtime = create_runtime();
        let state = GlobalState {
            ws_connected: create_rw_signal(false),
            notices: create_rw_signal(NoticeBoard::default()),
        };

        connection_changed(&state, true);
        assert!(state.ws_connected.get_untracked());

        connection_changed(&state, false);
        assert!(!state.ws_connected.get_untracked());

        runtime.dispose();
    }

    #[test]
    fn test_parse_status_notification() {
        let msg: WsMessage =
            serde_json::from_str(r#"{"type":"entry_status","email":"a@x.com","status":null}"#)
                .unwrap();
        assert!(matches!(msg, WsMessage::EntryStatus { status: None, .. }));
    }
}
