//! Admin Access
//!
//! The admin dashboard is gated by a single shared code held in server
//! configuration. Admin routes read it from the `X-Admin-Code` header; the
//! WebSocket hub reads it from the subscribe message.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::fmt;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::state::AppState;

/// Header carrying the admin code on admin routes
pub const ADMIN_CODE_HEADER: &str = "x-admin-code";

/// The configured admin code. An empty code disables admin access entirely.
#[derive(Clone)]
pub struct AdminCredentials {
    code: Arc<str>,
}

impl AdminCredentials {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Arc::from(code.into()),
        }
    }

    /// Admin access is disabled when no code is configured
    pub fn is_enabled(&self) -> bool {
        !self.code.is_empty()
    }

    /// Check a candidate code. All bytes are compared, whatever the first
    /// mismatch.
    pub fn verify(&self, candidate: &str) -> bool {
        let expected = self.code.as_bytes();
        let candidate = candidate.as_bytes();

        if expected.is_empty() || expected.len() != candidate.len() {
            return false;
        }

        expected
            .iter()
            .zip(candidate)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Extractor proving the request carried a valid admin code
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let code = parts
            .headers
            .get(ADMIN_CODE_HEADER)
            .and_then(|value| value.to_str().ok());

        match code {
            Some(code) if state.admin.verify(code) => Ok(AdminAccess),
            _ => Err(ApiError::Unauthorized("valid admin code required".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_exact_code_only() {
        let admin = AdminCredentials::new("forge-2026");
        assert!(admin.verify("forge-2026"));
        assert!(!admin.verify("forge-2025"));
        assert!(!admin.verify("forge-20266"));
        assert!(!admin.verify("FORGE-2026"));
        assert!(!admin.verify(""));
    }

    #[test]
    fn test_empty_code_disables_admin() {
        let admin = AdminCredentials::new("");
        assert!(!admin.is_enabled());
        assert!(!admin.verify(""));
    }

    #[test]
    fn test_debug_does_not_leak_code() {
        let admin = AdminCredentials::new("forge-2026");
        assert!(!format!("{:?}", admin).contains("forge-2026"));
    }
}
