//! Waitlist Routes
//!
//! Public endpoints used by the landing page.
//!
//! - POST /api/v1/waitlist - Join the waitlist
//! - GET /api/v1/waitlist/status?email= - Status for a cached email

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateEntryRequest, StatusQuery, StatusResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::JsonBody;
use crate::api::state::AppState;
use crate::store::WaitlistEntry;

/// POST /api/v1/waitlist
///
/// Create one entry with status `pending`.
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateEntryRequest>,
) -> ApiResult<(StatusCode, Json<WaitlistEntry>)> {
    let entry = state.store.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/waitlist/status
///
/// Status of the most recent entry for an email, `null` if there is none.
pub async fn entry_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<StatusResponse>> {
    let email = query.email.trim();
    if email.is_empty() {
        return Err(ApiError::Validation("email is required".to_string()));
    }

    let status = state
        .store
        .correlated(email)
        .await?
        .map(|entry| entry.status);

    Ok(Json(StatusResponse {
        email: email.to_string(),
        status,
    }))
}
