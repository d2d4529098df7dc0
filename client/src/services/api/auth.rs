//! # Authentication Endpoints
//!
//! Auth service client: login, logout, token refresh and validation.

use async_trait::async_trait;
use reqwest::Method;
use shared::{LoginRequest, RefreshRequest, TokenPair};

use super::client::ApiClient;
use crate::core::error::ApiError;
use crate::core::service::AuthService;

/// Client for `/auth/*`
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    /// `root` is the API root; the client scopes itself to `/auth`.
    pub fn new(root: &ApiClient) -> Self {
        Self {
            api: root.scoped("auth"),
        }
    }
}

#[async_trait]
impl AuthService for AuthClient {
    #[tracing::instrument(skip(self, request), fields(username = %request.username))]
    async fn login(&self, request: &LoginRequest) -> Result<TokenPair, ApiError> {
        tracing::info!("Attempting login");
        let start = std::time::Instant::now();

        let result = self
            .api
            .send_json::<TokenPair>(self.api.request(Method::POST, "login").json(request))
            .await;

        match &result {
            Ok(_) => tracing::info!(duration_ms = start.elapsed().as_millis(), "Login successful"),
            Err(e) => tracing::warn!(error = %e, duration_ms = start.elapsed().as_millis(), "Login failed"),
        }
        result
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.api
            .send_empty(self.api.request(Method::POST, "logout"))
            .await
    }

    #[tracing::instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let request = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.api
            .send_json(self.api.request(Method::POST, "refresh").json(&request))
            .await
    }

    async fn validate(&self, token: &str) -> Result<String, ApiError> {
        let response = self
            .api
            .execute(
                self.api
                    .request(Method::GET, "validate")
                    .query(&[("token", token)]),
            )
            .await?;
        response
            .text()
            .await
            .map(|username| username.trim().trim_matches('"').to_string())
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
