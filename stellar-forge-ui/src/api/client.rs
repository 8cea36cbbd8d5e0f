//! HTTP API Client
//!
//! Functions for the waitlist mutations. Reads arrive over live queries
//! instead (see `state::live`).

use gloo_net::http::{Request, Response};

use crate::state::WaitlistEntry;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8090/api/v1";

/// localStorage key overriding the API base
const API_BASE_KEY: &str = "stellar_forge_api_url";

/// Header carrying the admin code
const ADMIN_CODE_HEADER: &str = "X-Admin-Code";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_BASE_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

// ============ Response Types ============

#[derive(Debug, serde::Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Extract the server's message from a failed response
async fn error_message(response: Response, fallback: &str) -> String {
    match response.json::<ErrorResponse>().await {
        Ok(body) => {
            web_sys::console::error_1(
                &format!("API error {}: {}", body.error.code, body.error.message).into(),
            );
            body.error.message
        }
        Err(_) => fallback.to_string(),
    }
}

// ============ API Functions ============

/// Join the waitlist; the entry starts as `pending`
pub async fn join_waitlist(
    name: &str,
    email: &str,
    reason: &str,
) -> Result<WaitlistEntry, String> {
    #[derive(serde::Serialize)]
    struct CreateEntryRequest<'a> {
        name: &'a str,
        email: &'a str,
        reason: &'a str,
    }

    let response = Request::post(&format!("{}/waitlist", get_api_base()))
        .json(&CreateEntryRequest {
            name,
            email,
            reason,
        })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Could not join the waitlist").await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Check an admin code with the server
pub async fn open_admin_session(code: &str) -> Result<(), String> {
    #[derive(serde::Serialize)]
    struct AdminSessionRequest<'a> {
        code: &'a str,
    }

    let response = Request::post(&format!("{}/admin/session", get_api_base()))
        .json(&AdminSessionRequest { code })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    match response.status() {
        204 | 200 => Ok(()),
        401 => Err("Invalid admin code".to_string()),
        _ => Err(error_message(response, "Admin login failed").await),
    }
}

/// Mark an entry ready
pub async fn mark_ready(code: &str, id: &str) -> Result<WaitlistEntry, String> {
    let response = Request::post(&format!("{}/admin/waitlist/{}/ready", get_api_base(), id))
        .header(ADMIN_CODE_HEADER, code)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Could not update the entry").await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Remove an entry for good
pub async fn remove_entry(code: &str, id: &str) -> Result<(), String> {
    let response = Request::delete(&format!("{}/admin/waitlist/{}", get_api_base(), id))
        .header(ADMIN_CODE_HEADER, code)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Could not remove the entry").await);
    }

    Ok(())
}
