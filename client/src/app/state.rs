//! # Application State Types
//!
//! Plain state structs owned by the controllers. Each controller keeps its
//! state behind `Arc<RwLock<_>>` and hands out clones as snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{ArticleStatus, ArticleSummary, Comment, Notification, Tag, UserProfile};

use crate::services::api::ArticleQuery;
use crate::utils::jwt::AccessClaims;

/// Identity of the logged-in user, persisted as the `auth_user` blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredIdentity")]
pub struct UserIdentity {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Stored blob shape; older writers put the id under `userId`, or under both keys.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredIdentity {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    bio: Option<String>,
}

impl From<StoredIdentity> for UserIdentity {
    fn from(stored: StoredIdentity) -> Self {
        Self {
            id: stored.id.or(stored.user_id),
            username: stored.username,
            email: stored.email,
            avatar_url: stored.avatar_url,
            bio: stored.bio,
        }
    }
}

impl UserIdentity {
    pub fn from_claims(claims: &AccessClaims) -> Self {
        Self {
            id: claims.user_id,
            username: claims.sub.clone(),
            ..Self::default()
        }
    }

    /// Overlay a server profile; the profile wins on every field it carries.
    pub fn merge_profile(&mut self, profile: &UserProfile) {
        self.id = Some(profile.id);
        if !profile.username.is_empty() {
            self.username = Some(profile.username.clone());
        }
        if profile.email.is_some() {
            self.email = profile.email.clone();
        }
        if profile.avatar_url.is_some() {
            self.avatar_url = profile.avatar_url.clone();
        }
        if profile.bio.is_some() {
            self.bio = profile.bio.clone();
        }
    }

    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("unknown")
    }
}

/// Authentication session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserIdentity>,
    pub loading: bool,
    /// Last user-facing error
    pub error: Option<String>,
    /// Whether the login prompt should be shown
    pub show_login: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|token| !token.is_empty()) && self.user.is_some()
    }

    /// Drop tokens and identity, keeping UI flags.
    pub(crate) fn clear_credentials(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.user = None;
    }
}

/// Active article filters.
///
/// Status, tags and keyword are mutually exclusive through the controller's
/// mutators; the author filter composes with any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilters {
    pub status: Option<ArticleStatus>,
    pub tags: Vec<String>,
    pub keyword: Option<String>,
    pub author_id: Option<i64>,
}

impl ArticleFilters {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.tags.is_empty() && self.keyword.is_none() && self.author_id.is_none()
    }

    /// Backend query for a one-based `page`. Only the first tag is sent.
    pub fn to_query(&self, page: u32, size: u32) -> ArticleQuery {
        ArticleQuery {
            page: page.saturating_sub(1),
            size,
            status: self.status,
            tag: self.tags.first().cloned(),
            keyword: self
                .keyword
                .as_ref()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            author_id: self.author_id,
        }
    }

    /// Whether an item passes the client-side multi-tag intersection.
    pub fn matches_all_tags(&self, article: &ArticleSummary) -> bool {
        self.tags.iter().all(|tag| article.has_tag(tag))
    }
}

/// Paginated, filterable article list
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleListState {
    pub items: Vec<ArticleSummary>,
    /// One-based
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub filters: ArticleFilters,
    pub available_tags: Vec<Tag>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ArticleListState {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size,
            total_count: 0,
            total_pages: 0,
            filters: ArticleFilters::default(),
            available_tags: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// One article with its like status and first page of comments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleDetailState {
    pub article: Option<ArticleSummary>,
    pub liked: bool,
    pub comments: Vec<Comment>,
    pub comment_total: u64,
    pub loading: bool,
    pub error: Option<String>,
}

/// Polled notification list, newest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationListState {
    pub items: Vec<Notification>,
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl NotificationListState {
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }
}
