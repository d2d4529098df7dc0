//! # Service Traits
//!
//! Traits for dependency injection, one per backend service. Controllers hold
//! `Arc<dyn …Service>` so tests can swap in mock implementations; production
//! code uses [`crate::services::api::ApiClient`].

use async_trait::async_trait;
use shared::{
    ArticleRequest, ArticleSummary, Comment, CommentRequest, LikeStatus, LoginRequest, Page,
    RegistrationRequest, Tag, TokenPair, UserProfile,
};

use crate::core::error::ApiError;
use crate::services::api::ArticleQuery;

/// Auth service (`/auth/*`): token issue, refresh, revocation, validation.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a token pair
    async fn login(&self, request: &LoginRequest) -> Result<TokenPair, ApiError>;

    /// Revoke the current access token server-side
    async fn logout(&self) -> Result<(), ApiError>;

    /// Exchange a refresh token for a new pair
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError>;

    /// Validate a token, returning the username it belongs to
    async fn validate(&self, token: &str) -> Result<String, ApiError>;
}

/// User service (`/users/*`): accounts and profiles.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, request: &RegistrationRequest) -> Result<UserProfile, ApiError>;

    async fn get_user(&self, user_id: i64) -> Result<UserProfile, ApiError>;

    /// Multipart upload of the current user's avatar image
    async fn upload_avatar(&self, file_name: String, bytes: Vec<u8>) -> Result<UserProfile, ApiError>;
}

/// Article service (`/articles/*`): articles, tags, likes, comments.
#[async_trait]
pub trait ArticleService: Send + Sync {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<Page<ArticleSummary>, ApiError>;

    async fn get_article(&self, article_id: i64) -> Result<ArticleSummary, ApiError>;

    async fn create_article(&self, request: &ArticleRequest) -> Result<ArticleSummary, ApiError>;

    async fn update_article(
        &self,
        article_id: i64,
        request: &ArticleRequest,
    ) -> Result<ArticleSummary, ApiError>;

    async fn delete_article(&self, article_id: i64) -> Result<(), ApiError>;

    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError>;

    async fn like_article(&self, article_id: i64) -> Result<(), ApiError>;

    async fn unlike_article(&self, article_id: i64) -> Result<(), ApiError>;

    async fn like_status(&self, article_id: i64) -> Result<LikeStatus, ApiError>;

    /// One page of comments; `page` is zero-based
    async fn list_comments(
        &self,
        article_id: i64,
        page: u32,
        size: u32,
    ) -> Result<Page<Comment>, ApiError>;

    async fn create_comment(
        &self,
        article_id: i64,
        request: &CommentRequest,
    ) -> Result<Comment, ApiError>;

    async fn delete_comment(&self, article_id: i64, comment_id: i64) -> Result<(), ApiError>;
}

/// Notification service (`/notifications/*`).
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Raw response body; the controller normalizes non-array payloads
    async fn list_notifications(
        &self,
        limit: u32,
        unread_only: bool,
    ) -> Result<serde_json::Value, ApiError>;

    async fn mark_read(&self, notification_id: i64) -> Result<(), ApiError>;

    async fn mark_all_read(&self) -> Result<(), ApiError>;
}
