//! # API Client
//!
//! Shared HTTP plumbing for the per-service clients.
//!
//! Every request reads the access token from [`TokenStorage`] at build time and
//! attaches it as a bearer header, so a refreshed token is picked up by the
//! very next request without any shared default-header state.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::ErrorResponse;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::error::ApiError;
use crate::services::storage::TokenStorage;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client rooted at one service prefix (e.g. `http://host/api/auth`).
///
/// Cloning is cheap: the underlying `reqwest::Client` pools connections and
/// is shared between all scoped clients.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    storage: Arc<dyn TokenStorage>,
}

impl ApiClient {
    /// Create a client for `base_url` (the API root, e.g. `http://127.0.0.1:8080/api`).
    pub fn new(base_url: &str, timeout: Duration, storage: Arc<dyn TokenStorage>) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            storage,
        }
    }

    /// Same connection pool and credentials, rooted one path segment deeper.
    pub fn scoped(&self, prefix: &str) -> Self {
        Self {
            client: self.client.clone(),
            base_url: format!("{}/{}", self.base_url, prefix.trim_matches('/')),
            storage: Arc::clone(&self.storage),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    /// Start a request with the current bearer token attached, if any.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.storage.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and classify the response; non-success statuses become [`ApiError`].
    pub(crate) async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let start = Instant::now();
        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, "Network error");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let path = response.url().path().to_string();
        let duration_ms = start.elapsed().as_millis();

        if status.is_success() {
            tracing::debug!(status = status.as_u16(), path = %path, duration_ms, "API request completed");
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, parse_error_body(&text).as_ref());
        tracing::warn!(
            status = status.as_u16(),
            path = %path,
            duration_ms,
            error = %err,
            "API request failed"
        );
        Err(err)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        self.execute(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a request whose success body is irrelevant.
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.execute(builder).await.map(|_| ())
    }
}

/// Spring answers with a JSON error object most of the time, but a few
/// endpoints (`/auth/validate`, `/auth/logout`) return bare text.
pub(crate) fn parse_error_body(text: &str) -> Option<ErrorResponse> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str::<ErrorResponse>(trimmed).ok().or_else(|| {
        (!trimmed.starts_with('{') && !trimmed.starts_with('<')).then(|| ErrorResponse {
            message: Some(trimmed.to_string()),
            error: None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::{MemoryStorage, ACCESS_TOKEN_KEY};

    fn client() -> ApiClient {
        ApiClient::new(
            "http://localhost:8080/api/",
            DEFAULT_TIMEOUT,
            Arc::new(MemoryStorage::new()),
        )
    }

    #[test]
    fn test_url_joining() {
        let api = client();
        assert_eq!(api.base_url(), "http://localhost:8080/api");
        assert_eq!(api.url("/articles"), "http://localhost:8080/api/articles");

        let auth = api.scoped("/auth/");
        assert_eq!(auth.url("login"), "http://localhost:8080/api/auth/login");
        assert_eq!(auth.url(""), "http://localhost:8080/api/auth");
    }

    #[test]
    fn test_request_reads_token_per_call() {
        let storage = Arc::new(MemoryStorage::new());
        let api = ApiClient::new("http://localhost/api", DEFAULT_TIMEOUT, storage.clone());

        let req = api.request(Method::GET, "articles").build().unwrap();
        assert!(req.headers().get("authorization").is_none());

        storage.set(ACCESS_TOKEN_KEY, "t1").unwrap();
        let req = api.request(Method::GET, "articles").build().unwrap();
        assert_eq!(req.headers().get("authorization").unwrap(), "Bearer t1");
    }

    #[test]
    fn test_parse_error_body() {
        let json = parse_error_body(r#"{"message":"Invalid token"}"#).unwrap();
        assert_eq!(json.best_message(), Some("Invalid token"));

        let text = parse_error_body("Token expired").unwrap();
        assert_eq!(text.best_message(), Some("Token expired"));

        assert!(parse_error_body("   ").is_none());
        assert!(parse_error_body("<html>").is_none());
    }
}
