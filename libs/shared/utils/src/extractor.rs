use std::sync::Arc;

use axum::{
    extract::{FromRequest, State},
    http::{header::CONTENT_TYPE, HeaderMap, Request},
    middleware::Next,
    response::Response,
    body::{Body, Bytes},
};
use serde::de::DeserializeOwned;

use shared_models::auth::{AdminClaims, ADMIN_ROLE};
use shared_models::error::AppError;
use shared_config::AppConfig;

use crate::jwt::validate_token;

/// Legacy header the admin panel sends its token in.
pub const ADMIN_TOKEN_HEADER: &str = "atoken";

const NOT_AUTHORIZED: &str = "Not authorized, login again";

pub fn extract_admin_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get("Authorization").and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }

    headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check a token against the configured admin identity.
pub fn verify_admin_token(token: &str, config: &AppConfig) -> Result<AdminClaims, AppError> {
    let claims = validate_token(token, &config.jwt_secret).map_err(|e| {
        tracing::debug!("Admin token rejected: {}", e);
        AppError::Auth(NOT_AUTHORIZED.to_string())
    })?;

    if config.admin_email.is_empty()
        || claims.email != config.admin_email
        || claims.role != ADMIN_ROLE
    {
        return Err(AppError::Auth(NOT_AUTHORIZED.to_string()));
    }

    Ok(claims)
}

pub async fn admin_auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_admin_token(request.headers())
        .ok_or_else(|| AppError::Auth(NOT_AUTHORIZED.to_string()))?;

    let claims = verify_admin_token(&token, &config)?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// JSON request body whose rejections render as the API's error envelope.
///
/// An absent or blank body yields `T::default()`, so the handler reports the
/// missing fields itself. A non-JSON or malformed body is `InvalidInput`.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        if !is_json {
            return Err(AppError::InvalidInput(
                "Request body must be JSON (Content-Type: application/json)".to_string(),
            ));
        }

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| AppError::InvalidInput(format!("Invalid request body: {}", e)))
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_legacy_header() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer abc"));
        headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_static("def"));

        assert_eq!(extract_admin_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn legacy_header_is_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_static("def"));

        assert_eq!(extract_admin_token(&headers).as_deref(), Some("def"));
    }

    #[test]
    fn missing_token_yields_none() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Basic xyz"));

        assert!(extract_admin_token(&headers).is_none());
    }

    #[derive(Debug, Default, serde::Deserialize)]
    struct IdBody {
        id: Option<String>,
    }

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<IdBody, AppError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();

        JsonBody::<IdBody>::from_request(request, &()).await.map(|JsonBody(inner)| inner)
    }

    #[tokio::test]
    async fn json_body_parses_json() {
        let parsed = extract(Some("application/json; charset=utf-8"), r#"{"id":"abc"}"#).await.unwrap();

        assert_eq!(parsed.id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn absent_body_defaults_regardless_of_content_type() {
        assert!(extract(None, "").await.unwrap().id.is_none());
        assert!(extract(Some("application/json"), "  \n").await.unwrap().id.is_none());
    }

    #[tokio::test]
    async fn non_json_body_is_invalid_input() {
        let result = extract(Some("application/x-www-form-urlencoded"), "id=abc").await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn wrongly_typed_field_is_invalid_input() {
        let result = extract(Some("application/json"), r#"{"id":123}"#).await;

        match result {
            Err(AppError::InvalidInput(message)) => assert!(message.starts_with("Invalid request body")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }
}
