//! # Notification Endpoints

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::client::ApiClient;
use crate::core::error::ApiError;
use crate::core::service::NotificationService;

/// Client for `/notifications/*`
#[derive(Clone)]
pub struct NotificationClient {
    api: ApiClient,
}

impl NotificationClient {
    pub fn new(root: &ApiClient) -> Self {
        Self {
            api: root.scoped("notifications"),
        }
    }
}

#[async_trait]
impl NotificationService for NotificationClient {
    async fn list_notifications(&self, limit: u32, unread_only: bool) -> Result<Value, ApiError> {
        let mut builder = self
            .api
            .request(Method::GET, "me")
            .query(&[("limit", limit)]);
        if unread_only {
            builder = builder.query(&[("unreadOnly", true)]);
        }
        self.api.send_json(builder).await
    }

    async fn mark_read(&self, notification_id: i64) -> Result<(), ApiError> {
        self.api
            .send_empty(
                self.api
                    .request(Method::POST, &format!("{}/read", notification_id)),
            )
            .await
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.api
            .send_empty(self.api.request(Method::POST, "read-all"))
            .await
    }
}
