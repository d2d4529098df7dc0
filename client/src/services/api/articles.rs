//! # Article Endpoints
//!
//! Article service client: article CRUD, tags, likes and comments.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use shared::{
    ArticleRequest, ArticleStatus, ArticleSummary, Comment, CommentRequest, LikeStatus, Page, Tag,
};

use super::client::ApiClient;
use crate::core::error::ApiError;
use crate::core::service::ArticleService;

/// Query parameters for `GET /articles`. `page` is zero-based.
///
/// The backend honours one filter at a time (keyword, then tag, then status);
/// `authorId` narrows any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleQuery {
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
}

/// Client for `/articles/*`
#[derive(Clone)]
pub struct ArticleClient {
    api: ApiClient,
}

impl ArticleClient {
    pub fn new(root: &ApiClient) -> Self {
        Self {
            api: root.scoped("articles"),
        }
    }
}

/// Comments come back paginated, but older deployments return a bare array.
fn comments_page(body: Value, size: u32) -> Result<Page<Comment>, ApiError> {
    match body {
        Value::Array(_) => {
            let records: Vec<Comment> =
                serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
            Ok(Page {
                total: records.len() as u64,
                size,
                current: 1,
                pages: 1,
                records,
            })
        }
        Value::Null => Ok(Page::default()),
        other => serde_json::from_value(other).map_err(|e| ApiError::Decode(e.to_string())),
    }
}

#[async_trait]
impl ArticleService for ArticleClient {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<Page<ArticleSummary>, ApiError> {
        tracing::debug!(?query, "Fetching articles");
        self.api
            .send_json(self.api.request(Method::GET, "").query(query))
            .await
    }

    async fn get_article(&self, article_id: i64) -> Result<ArticleSummary, ApiError> {
        self.api
            .send_json(self.api.request(Method::GET, &article_id.to_string()))
            .await
    }

    async fn create_article(&self, request: &ArticleRequest) -> Result<ArticleSummary, ApiError> {
        tracing::info!(title = %request.title, status = %request.status, "Creating article");
        self.api
            .send_json(self.api.request(Method::POST, "").json(request))
            .await
    }

    async fn update_article(
        &self,
        article_id: i64,
        request: &ArticleRequest,
    ) -> Result<ArticleSummary, ApiError> {
        self.api
            .send_json(
                self.api
                    .request(Method::PUT, &article_id.to_string())
                    .json(request),
            )
            .await
    }

    async fn delete_article(&self, article_id: i64) -> Result<(), ApiError> {
        self.api
            .send_empty(self.api.request(Method::DELETE, &article_id.to_string()))
            .await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.api
            .send_json(self.api.request(Method::GET, "tags"))
            .await
    }

    async fn like_article(&self, article_id: i64) -> Result<(), ApiError> {
        self.api
            .send_empty(self.api.request(Method::POST, &format!("{}/likes", article_id)))
            .await
    }

    async fn unlike_article(&self, article_id: i64) -> Result<(), ApiError> {
        self.api
            .send_empty(self.api.request(Method::DELETE, &format!("{}/likes", article_id)))
            .await
    }

    async fn like_status(&self, article_id: i64) -> Result<LikeStatus, ApiError> {
        self.api
            .send_json(
                self.api
                    .request(Method::GET, &format!("{}/likes/status", article_id)),
            )
            .await
    }

    async fn list_comments(
        &self,
        article_id: i64,
        page: u32,
        size: u32,
    ) -> Result<Page<Comment>, ApiError> {
        let body: Value = self
            .api
            .send_json(
                self.api
                    .request(Method::GET, &format!("{}/comments", article_id))
                    .query(&[("page", page), ("size", size)]),
            )
            .await?;
        comments_page(body, size)
    }

    async fn create_comment(
        &self,
        article_id: i64,
        request: &CommentRequest,
    ) -> Result<Comment, ApiError> {
        self.api
            .send_json(
                self.api
                    .request(Method::POST, &format!("{}/comments", article_id))
                    .json(request),
            )
            .await
    }

    async fn delete_comment(&self, article_id: i64, comment_id: i64) -> Result<(), ApiError> {
        self.api
            .send_empty(
                self.api
                    .request(Method::DELETE, &format!("{}/comments/{}", article_id, comment_id)),
            )
            .await
    }
}
