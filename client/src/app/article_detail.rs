//! # Article Detail Controller
//!
//! One article with the viewer's like status and the first page of comments.

use async_channel::Sender;
use parking_lot::RwLock;
use std::sync::Arc;

use shared::{ArticleSummary, Comment, CommentRequest};

use super::events::AppEvent;
use super::publish;
use super::session::{SessionManager, SESSION_EXPIRED_MESSAGE};
use super::state::ArticleDetailState;
use crate::core::error::ApiError;
use crate::core::service::ArticleService;

/// Comments loaded with an article
pub const COMMENT_PAGE_SIZE: u32 = 20;

#[derive(Clone)]
pub struct ArticleDetailController {
    state: Arc<RwLock<ArticleDetailState>>,
    service: Arc<dyn ArticleService>,
    session: SessionManager,
    events: Sender<AppEvent>,
}

impl ArticleDetailController {
    pub fn new(service: Arc<dyn ArticleService>, session: SessionManager, events: Sender<AppEvent>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ArticleDetailState::default())),
            service,
            session,
            events,
        }
    }

    pub fn state(&self) -> ArticleDetailState {
        self.state.read().clone()
    }

    /// Load an article, then its comments and (when logged in) the like status.
    pub async fn load(&self, article_id: i64) -> Result<ArticleSummary, ApiError> {
        {
            let mut state = self.state.write();
            *state = ArticleDetailState {
                loading: true,
                ..ArticleDetailState::default()
            };
        }

        let article = match self.service.get_article(article_id).await {
            Ok(article) => article,
            Err(err) => {
                tracing::error!(article_id, error = %err, "Failed to load article");
                {
                    let mut state = self.state.write();
                    state.loading = false;
                    state.error = Some(match &err {
                        ApiError::NotFound(_) => "Article not found".to_string(),
                        _ => "Failed to load article. Please try again later.".to_string(),
                    });
                }
                self.check_session(&err);
                publish(&self.events, AppEvent::ArticleDetailUpdated);
                return Err(err);
            }
        };

        let liked = if self.session.has_access_token() {
            match self.service.like_status(article_id).await {
                Ok(status) => status.liked,
                Err(err) => {
                    tracing::warn!(article_id, error = %err, "Failed to load like status");
                    self.check_session(&err);
                    false
                }
            }
        } else {
            false
        };

        {
            let mut state = self.state.write();
            state.article = Some(article.clone());
            state.liked = liked;
        }
        self.reload_comments().await;

        self.state.write().loading = false;
        publish(&self.events, AppEvent::ArticleDetailUpdated);
        Ok(article)
    }

    /// Like or unlike the loaded article; returns the new like flag.
    pub async fn toggle_like(&self) -> Result<bool, ApiError> {
        let (article_id, liked) = self.current()?;

        let result = if liked {
            self.service.unlike_article(article_id).await
        } else {
            self.service.like_article(article_id).await
        };
        result.inspect_err(|err| self.check_session(err))?;

        let now_liked = !liked;
        {
            let mut state = self.state.write();
            state.liked = now_liked;
            if let Some(article) = state.article.as_mut() {
                let count = article.like_count.unwrap_or(0);
                article.like_count = Some(if now_liked {
                    count + 1
                } else {
                    count.saturating_sub(1)
                });
            }
        }
        publish(&self.events, AppEvent::ArticleDetailUpdated);
        Ok(now_liked)
    }

    /// Post a comment (or reply) and reload the comment page.
    pub async fn add_comment(&self, content: &str, parent_id: Option<i64>) -> Result<Comment, ApiError> {
        let (article_id, _) = self.current()?;
        let content = content.trim();
        if content.is_empty() {
            return Err(ApiError::Validation("Comment cannot be empty".to_string()));
        }

        let request = CommentRequest {
            content: content.to_string(),
            parent_id,
        };
        let comment = self
            .service
            .create_comment(article_id, &request)
            .await
            .inspect_err(|err| self.check_session(err))?;

        tracing::info!(article_id, comment_id = comment.id, "Comment posted");
        self.reload_comments().await;
        publish(&self.events, AppEvent::ArticleDetailUpdated);
        Ok(comment)
    }

    /// Delete a comment and remove it (or the reply) locally.
    pub async fn delete_comment(&self, comment_id: i64) -> Result<(), ApiError> {
        let (article_id, _) = self.current()?;
        self.service
            .delete_comment(article_id, comment_id)
            .await
            .inspect_err(|err| self.check_session(err))?;

        {
            let mut state = self.state.write();
            let before = state.comments.len();
            state.comments.retain(|comment| comment.id != comment_id);
            let removed = state.comments.len() < before
                || state.comments.iter_mut().any(|comment| comment.remove_reply(comment_id));
            if removed {
                state.comment_total = state.comment_total.saturating_sub(1);
            }
        }
        publish(&self.events, AppEvent::ArticleDetailUpdated);
        Ok(())
    }

    async fn reload_comments(&self) {
        let Ok((article_id, _)) = self.current() else {
            return;
        };

        match self.service.list_comments(article_id, 0, COMMENT_PAGE_SIZE).await {
            Ok(page) => {
                let mut state = self.state.write();
                state.comment_total = page.total.max(page.records.len() as u64);
                state.comments = page.records;
            }
            Err(err) => {
                tracing::warn!(article_id, error = %err, "Failed to load comments");
                self.check_session(&err);
            }
        }
    }

    fn current(&self) -> Result<(i64, bool), ApiError> {
        let state = self.state.read();
        state
            .article
            .as_ref()
            .map(|article| (article.id, state.liked))
            .ok_or_else(|| ApiError::Validation("No article loaded".to_string()))
    }

    fn check_session(&self, err: &ApiError) {
        if err.is_unauthorized() {
            self.session.handle_session_expired(SESSION_EXPIRED_MESSAGE);
        }
    }
}
