//! End-to-end waitlist flow: a visitor signs up through the HTTP API, keeps a
//! live status query open, and sees the admin's decisions arrive.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use stellar_forge::api::{build_router, AdminCredentials, ApiConfig, AppState, ADMIN_CODE_HEADER};
use stellar_forge::store::{EntryStatus, LiveQuery, Snapshot, WaitlistEntry, WaitlistStore};
use stellar_forge::websocket::{ConnectionHub, HubConfig, ServerMessage, Topic};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tower::util::ServiceExt;

const CODE: &str = "dev-city";

fn app() -> (Router, Arc<WaitlistStore>) {
    let store = Arc::new(WaitlistStore::open_in_memory().unwrap());
    let state = AppState::new(
        Arc::clone(&store),
        ApiConfig::default(),
        AdminCredentials::new(CODE),
    );
    (build_router(state), store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn signup(app: &Router, name: &str, email: &str) -> WaitlistEntry {
    let body = serde_json::json!({ "name": name, "email": email, "reason": "Love space sims" });
    let (status, bytes) = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/v1/waitlist")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_slice(&bytes).unwrap()
}

fn admin_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(ADMIN_CODE_HEADER, CODE)
        .body(Body::empty())
        .unwrap()
}

async fn next_status(sub: &mut stellar_forge::Subscription) -> Option<EntryStatus> {
    match timeout(Duration::from_secs(1), sub.next())
        .await
        .expect("live query stalled")
    {
        Some(Ok(Snapshot::Status { status, .. })) => status,
        other => panic!("unexpected snapshot: {:?}", other),
    }
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<ServerMessage>) -> ServerMessage {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out")
        .expect("channel closed")
}

#[tokio::test]
async fn signup_then_ready_then_removed() {
    let (app, store) = app();

    let mut status = store.watch(LiveQuery::ByEmail("ada@example.com".to_string()));
    assert_eq!(next_status(&mut status).await, None);

    let entry = signup(&app, "Ada", "ada@example.com").await;
    assert_eq!(entry.status, EntryStatus::Pending);
    assert_eq!(next_status(&mut status).await, Some(EntryStatus::Pending));

    let (code, _) = send(
        &app,
        admin_request("POST", &format!("/api/v1/admin/waitlist/{}/ready", entry.id)),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(next_status(&mut status).await, Some(EntryStatus::Ready));

    let (code, _) = send(
        &app,
        admin_request("DELETE", &format!("/api/v1/admin/waitlist/{}", entry.id)),
    )
    .await;
    assert_eq!(code, StatusCode::NO_CONTENT);
    assert_eq!(next_status(&mut status).await, None);

    assert_eq!(store.active_listeners(), 1);
    drop(status);
    assert_eq!(store.active_listeners(), 0);
}

#[tokio::test]
async fn other_visitors_do_not_disturb_a_status_query() {
    let (app, store) = app();
    let ada = signup(&app, "Ada", "ada@example.com").await;

    let mut status = store.watch(LiveQuery::ByEmail(ada.email.clone()));
    assert_eq!(next_status(&mut status).await, Some(EntryStatus::Pending));

    let grace = signup(&app, "Grace", "grace@example.com").await;
    let (code, _) = send(
        &app,
        admin_request("POST", &format!("/api/v1/admin/waitlist/{}/ready", grace.id)),
    )
    .await;
    assert_eq!(code, StatusCode::OK);

    assert!(
        timeout(Duration::from_millis(100), status.next()).await.is_err(),
        "status query woke up for another email"
    );
}

#[tokio::test]
async fn hub_pushes_status_and_dashboard_updates() {
    let (app, store) = app();
    let hub = ConnectionHub::new(HubConfig::default(), Arc::clone(&store));

    let (visitor_tx, mut visitor_rx) = mpsc::unbounded_channel();
    let visitor = hub.register(visitor_tx).await.unwrap();
    hub.subscribe(&visitor, vec![Topic::entry("ada@example.com")], false)
        .await
        .unwrap();

    let (admin_tx, mut admin_rx) = mpsc::unbounded_channel();
    let admin = hub.register(admin_tx).await.unwrap();
    hub.subscribe(&admin, vec!["waitlist".to_string()], true)
        .await
        .unwrap();

    assert!(matches!(
        recv(&mut visitor_rx).await,
        ServerMessage::EntryStatus { status: None, .. }
    ));
    match recv(&mut admin_rx).await {
        ServerMessage::Entries { entries } => assert!(entries.is_empty()),
        other => panic!("unexpected message: {:?}", other),
    }

    let entry = signup(&app, "Ada", "ada@example.com").await;

    assert!(matches!(
        recv(&mut visitor_rx).await,
        ServerMessage::EntryStatus { status: Some(EntryStatus::Pending), .. }
    ));
    match recv(&mut admin_rx).await {
        ServerMessage::Entries { entries } => assert_eq!(entries, vec![entry]),
        other => panic!("unexpected message: {:?}", other),
    }

    hub.unregister(&visitor).await;
    hub.unregister(&admin).await;
    timeout(Duration::from_secs(1), async {
        while store.active_listeners() != 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("live queries were not released");
}
