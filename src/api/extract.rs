//! Request Extractors
//!
//! `JsonBody` is axum's `Json` with its rejection mapped onto `ApiError`, so
//! malformed or incomplete bodies get the same error envelope as every other
//! validation failure.

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;

/// JSON request body
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Signup {
        name: String,
        email: String,
    }

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header("Content-Type", content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_complete_body_is_extracted() {
        let req = request(Some("application/json"), r#"{"name":"Ada","email":"a@x.com"}"#);
        let JsonBody(signup) = JsonBody::<Signup>::from_request(req, &()).await.unwrap();
        assert_eq!(signup.name, "Ada");
        assert_eq!(signup.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_missing_field_is_a_validation_error() {
        let req = request(Some("application/json"), r#"{"name":"Ada"}"#);
        let err = JsonBody::<Signup>::from_request(req, &()).await.unwrap_err();
        match err {
            ApiError::Validation(msg) => assert!(msg.contains("email"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_content_type_is_a_validation_error() {
        let req = request(None, r#"{"name":"Ada","email":"a@x.com"}"#);
        let err = JsonBody::<Signup>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
