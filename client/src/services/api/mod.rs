//! # Backend API Client Module
//!
//! HTTP clients for the blog backend services, all sharing one connection
//! pool and one token store.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs           - ApiClients bundle
//! ├── client.rs        - ApiClient: request building, bearer injection, error classification
//! ├── auth.rs          - /auth/*          (login, logout, refresh, validate)
//! ├── users.rs         - /users/*         (register, profile, avatar)
//! ├── articles.rs      - /articles/*      (articles, tags, likes, comments)
//! └── notifications.rs - /notifications/* (list, mark read)
//! ```

pub mod articles;
pub mod auth;
pub mod client;
pub mod notifications;
pub mod users;

pub use articles::{ArticleClient, ArticleQuery};
pub use auth::AuthClient;
pub use client::ApiClient;
pub use notifications::NotificationClient;
pub use users::UserClient;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::services::storage::TokenStorage;

/// One configured client per backend service.
#[derive(Clone)]
pub struct ApiClients {
    pub auth: Arc<AuthClient>,
    pub users: Arc<UserClient>,
    pub articles: Arc<ArticleClient>,
    pub notifications: Arc<NotificationClient>,
}

impl ApiClients {
    pub fn new(config: &ClientConfig, storage: Arc<dyn TokenStorage>) -> Self {
        let root = ApiClient::new(&config.api_base_url, config.request_timeout, storage);
        Self::from_root(&root)
    }

    pub fn from_root(root: &ApiClient) -> Self {
        Self {
            auth: Arc::new(AuthClient::new(root)),
            users: Arc::new(UserClient::new(root)),
            articles: Arc::new(ArticleClient::new(root)),
            notifications: Arc::new(NotificationClient::new(root)),
        }
    }
}
