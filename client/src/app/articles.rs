//! # Article List Controller
//!
//! Paginated, filterable article list. Pages are one-based here and
//! translated to the backend's zero-based pages when the query is built.

use async_channel::Sender;
use parking_lot::RwLock;
use std::sync::Arc;

use shared::{ArticleRequest, ArticleStatus, ArticleSummary};

use super::events::AppEvent;
use super::publish;
use super::session::{SessionManager, SESSION_EXPIRED_MESSAGE};
use super::state::{ArticleFilters, ArticleListState};
use crate::core::error::ApiError;
use crate::core::service::ArticleService;

pub const FETCH_ARTICLES_ERROR: &str = "Failed to fetch articles. Please try again later.";

/// Shared handle to the article list
#[derive(Clone)]
pub struct ArticleListController {
    state: Arc<RwLock<ArticleListState>>,
    service: Arc<dyn ArticleService>,
    session: SessionManager,
    events: Sender<AppEvent>,
}

impl ArticleListController {
    pub fn new(
        service: Arc<dyn ArticleService>,
        session: SessionManager,
        events: Sender<AppEvent>,
        page_size: u32,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(ArticleListState::new(page_size))),
            service,
            session,
            events,
        }
    }

    pub fn state(&self) -> ArticleListState {
        self.state.read().clone()
    }

    pub fn filters(&self) -> ArticleFilters {
        self.state.read().filters.clone()
    }

    /// Fetch one page with the given filters; the filters become current once
    /// the page has loaded.
    ///
    /// With several tags selected only the first is sent; the page is then
    /// narrowed to items carrying every tag and the total becomes the
    /// narrowed count.
    pub async fn fetch(&self, page: u32, size: u32, filters: ArticleFilters) -> Result<(), ApiError> {
        let page = page.max(1);
        let size = size.max(1);
        let query = filters.to_query(page, size);
        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }

        let result = self.service.list_articles(&query).await;

        match result {
            Ok(response) => {
                let multi_tag = filters.tags.len() > 1;
                let items: Vec<ArticleSummary> = if multi_tag {
                    response
                        .records
                        .into_iter()
                        .filter(|article| filters.matches_all_tags(article))
                        .collect()
                } else {
                    response.records
                };

                let page_size = if response.size > 0 { response.size } else { size };
                let (total_count, total_pages) = if multi_tag {
                    let total = items.len() as u64;
                    (total, pages_for(total, page_size))
                } else {
                    (response.total, response.pages)
                };

                tracing::debug!(
                    page,
                    total = total_count,
                    returned = items.len(),
                    "Articles fetched"
                );

                {
                    let mut state = self.state.write();
                    state.items = items;
                    state.page = if response.current > 0 { response.current } else { page };
                    state.page_size = page_size;
                    state.total_count = total_count;
                    state.total_pages = total_pages;
                    state.filters = filters;
                    state.loading = false;
                }
                publish(&self.events, AppEvent::ArticlesUpdated);
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, page, "Error fetching articles");
                {
                    let mut state = self.state.write();
                    state.loading = false;
                    state.error = Some(FETCH_ARTICLES_ERROR.to_string());
                }
                self.check_session(&err);
                publish(&self.events, AppEvent::ArticlesUpdated);
                Err(err)
            }
        }
    }

    /// Re-fetch the current page with the current filters.
    pub async fn reload(&self) -> Result<(), ApiError> {
        let (page, size, filters) = {
            let state = self.state.read();
            (state.page, state.page_size, state.filters.clone())
        };
        self.fetch(page, size, filters).await
    }

    pub async fn go_to_page(&self, page: u32) -> Result<(), ApiError> {
        let (size, filters) = {
            let state = self.state.read();
            (state.page_size, state.filters.clone())
        };
        self.fetch(page, size, filters).await
    }

    /// Load the tag catalogue. Failures are logged only.
    pub async fn fetch_tags(&self) {
        match self.service.list_tags().await {
            Ok(tags) => {
                self.state.write().available_tags = tags;
                publish(&self.events, AppEvent::TagsUpdated);
            }
            Err(err) => {
                tracing::warn!(error = %err, "Error fetching tags");
            }
        }
    }

    /// Filter by status, clearing tags and keyword; the author filter stays.
    pub async fn filter_by_status(&self, status: Option<ArticleStatus>) -> Result<(), ApiError> {
        self.refilter(|filters| {
            filters.status = status;
            filters.tags.clear();
            filters.keyword = None;
        })
        .await
    }

    /// Add or remove a tag from the selection, clearing status and keyword.
    pub async fn toggle_tag(&self, tag: &str) -> Result<(), ApiError> {
        self.refilter(|filters| {
            if let Some(index) = filters.tags.iter().position(|t| t == tag) {
                filters.tags.remove(index);
            } else {
                filters.tags.push(tag.to_string());
            }
            filters.status = None;
            filters.keyword = None;
        })
        .await
    }

    pub fn is_tag_selected(&self, tag: &str) -> bool {
        self.state.read().filters.tags.iter().any(|t| t == tag)
    }

    /// Keyword search, clearing status and tags.
    pub async fn search(&self, keyword: &str) -> Result<(), ApiError> {
        let keyword = keyword.trim();
        self.refilter(|filters| {
            filters.keyword = (!keyword.is_empty()).then(|| keyword.to_string());
            filters.status = None;
            filters.tags.clear();
        })
        .await
    }

    pub async fn filter_by_author(&self, author_id: Option<i64>) -> Result<(), ApiError> {
        self.refilter(|filters| filters.author_id = author_id).await
    }

    pub async fn clear_filters(&self) -> Result<(), ApiError> {
        self.refilter(|filters| *filters = ArticleFilters::default()).await
    }

    pub async fn create_article(&self, request: &ArticleRequest) -> Result<ArticleSummary, ApiError> {
        let article = self
            .service
            .create_article(request)
            .await
            .inspect_err(|err| self.check_session(err))?;
        tracing::info!(article_id = article.id, "Article created");
        Ok(article)
    }

    /// Update an article, replacing the local copy when it is on the current page.
    pub async fn update_article(
        &self,
        article_id: i64,
        request: &ArticleRequest,
    ) -> Result<ArticleSummary, ApiError> {
        let article = self
            .service
            .update_article(article_id, request)
            .await
            .inspect_err(|err| self.check_session(err))?;

        let replaced = {
            let mut state = self.state.write();
            match state.items.iter_mut().find(|item| item.id == article_id) {
                Some(item) => {
                    *item = article.clone();
                    true
                }
                None => false,
            }
        };
        if replaced {
            publish(&self.events, AppEvent::ArticlesUpdated);
        }
        tracing::info!(article_id, "Article updated");
        Ok(article)
    }

    /// Delete an article and drop it from the local list without re-fetching.
    pub async fn delete_article(&self, article_id: i64) -> Result<(), ApiError> {
        self.service
            .delete_article(article_id)
            .await
            .inspect_err(|err| self.check_session(err))?;

        {
            let mut state = self.state.write();
            let before = state.items.len();
            state.items.retain(|item| item.id != article_id);
            if state.items.len() < before {
                state.total_count = state.total_count.saturating_sub(1);
            }
        }
        publish(&self.events, AppEvent::ArticlesUpdated);
        tracing::info!(article_id, "Article deleted");
        Ok(())
    }

    async fn refilter(&self, update: impl FnOnce(&mut ArticleFilters)) -> Result<(), ApiError> {
        let (size, mut filters) = {
            let state = self.state.read();
            (state.page_size, state.filters.clone())
        };
        update(&mut filters);
        self.fetch(1, size, filters).await
    }

    fn check_session(&self, err: &ApiError) {
        if err.is_unauthorized() {
            self.session.handle_session_expired(SESSION_EXPIRED_MESSAGE);
        }
    }
}

fn pages_for(total: u64, size: u32) -> u32 {
    if size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(size)) as u32
}
