//! Admin Routes
//!
//! Dashboard endpoints. Everything except the session check requires the
//! `X-Admin-Code` header.
//!
//! - POST /api/v1/admin/session - Verify an admin code
//! - GET /api/v1/admin/waitlist - All entries, oldest first
//! - GET /api/v1/admin/waitlist/:id - One entry
//! - POST /api/v1/admin/waitlist/:id/ready - Mark an entry ready
//! - DELETE /api/v1/admin/waitlist/:id - Remove an entry

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::auth::AdminAccess;
use crate::api::dto::{AdminSessionRequest, EntryListResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::JsonBody;
use crate::api::state::AppState;
use crate::store::{EntryId, WaitlistEntry};

/// POST /api/v1/admin/session
///
/// 204 when the code matches, 401 otherwise. Nothing is stored server-side;
/// the client keeps the code in memory for the rest of the page session.
pub async fn open_session(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AdminSessionRequest>,
) -> ApiResult<StatusCode> {
    if state.admin.verify(&req.code) {
        tracing::info!("Admin session opened");
        Ok(StatusCode::NO_CONTENT)
    } else {
        tracing::warn!("Rejected admin code");
        Err(ApiError::Unauthorized("invalid admin code".to_string()))
    }
}

/// GET /api/v1/admin/waitlist
pub async fn list_entries(
    _admin: AdminAccess,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<EntryListResponse>> {
    let entries = state.store.list().await?;
    Ok(Json(EntryListResponse {
        total: entries.len(),
        entries,
    }))
}

/// GET /api/v1/admin/waitlist/:id
pub async fn get_entry(
    _admin: AdminAccess,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<WaitlistEntry>> {
    let entry = state.store.get(&EntryId::from(id)).await?;
    Ok(Json(entry))
}

/// POST /api/v1/admin/waitlist/:id/ready
///
/// Idempotent; marking a ready entry again returns it unchanged.
pub async fn mark_ready(
    _admin: AdminAccess,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<WaitlistEntry>> {
    let entry = state.store.mark_ready(&EntryId::from(id)).await?;
    Ok(Json(entry))
}

/// DELETE /api/v1/admin/waitlist/:id
pub async fn remove_entry(
    _admin: AdminAccess,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete(&EntryId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
