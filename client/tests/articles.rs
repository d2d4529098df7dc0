//! Article list and detail controllers against a mocked article service.

mod common;

use common::*;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use blog_client::app::articles::FETCH_ARTICLES_ERROR;
use blog_client::app::ArticleFilters;
use blog_client::services::storage::{MemoryStorage, TokenStorage, ACCESS_TOKEN_KEY};
use blog_client::ApiError;
use shared::ArticleStatus;

#[tokio::test]
async fn test_second_tag_narrows_to_intersection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("tag", "rust"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![
                article_json(1, &["rust", "async"]),
                article_json(2, &["rust"]),
                article_json(3, &["async", "rust", "web"]),
            ],
            25,
            1,
            3,
        )))
        .expect(2)
        .mount(&server)
        .await;

    let app = app_for(&server, Arc::new(MemoryStorage::new()));

    app.articles.toggle_tag("rust").await.unwrap();
    let state = app.articles.state();
    assert_eq!(state.items.len(), 3);
    assert_eq!(state.total_count, 25);

    app.articles.toggle_tag("async").await.unwrap();
    let state = app.articles.state();
    assert_eq!(state.items.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(state.total_count, 2);
    assert!(app.articles.is_tag_selected("async"));
}

#[tokio::test]
async fn test_filter_change_resets_to_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![article_json(21, &[])], 30, 3, 3)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("page", "0"))
        .and(query_param("status", "DRAFT"))
        .and(query_param("authorId", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![article_json(1, &[])], 1, 1, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server, Arc::new(MemoryStorage::new()));
    let filters = ArticleFilters {
        author_id: Some(7),
        ..ArticleFilters::default()
    };
    app.articles.fetch(3, 10, filters).await.unwrap();
    assert_eq!(app.articles.state().page, 3);

    app.articles.filter_by_status(Some(ArticleStatus::Draft)).await.unwrap();
    let state = app.articles.state();
    assert_eq!(state.page, 1);
    assert_eq!(state.filters.author_id, Some(7));
    assert_eq!(state.filters.status, Some(ArticleStatus::Draft));
}

#[tokio::test]
async fn test_unauthorized_clears_session_exactly_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let storage = logged_in_storage("stale", "refresh-1");
    let app = app_for(&server, storage.clone());

    let err = app.articles.go_to_page(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));

    let state = app.articles.state();
    assert_eq!(state.error.as_deref(), Some(FETCH_ARTICLES_ERROR));
    assert!(!state.loading);

    let session = app.session.state();
    assert!(!session.is_authenticated());
    assert!(session.show_login);
    assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
    assert_eq!(count_expired(&drain(&app)), 1);
}

#[tokio::test]
async fn test_fetch_failure_sets_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = app_for(&server, logged_in_storage("access-1", "refresh-1"));
    assert!(app.articles.search("tokio").await.is_err());
    assert_eq!(app.articles.state().error.as_deref(), Some(FETCH_ARTICLES_ERROR));
    // Non-401 failures leave the session alone
    assert!(app.session.is_authenticated());
}

#[tokio::test]
async fn test_tags_and_delete() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "rust"}, {"id": 2, "name": "web"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![article_json(1, &[]), article_json(2, &[])],
            2,
            1,
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/articles/2"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server, logged_in_storage("access-1", "refresh-1"));
    app.articles.fetch_tags().await;
    assert_eq!(app.articles.state().available_tags.len(), 2);

    app.articles.go_to_page(1).await.unwrap();
    app.articles.delete_article(2).await.unwrap();

    let state = app.articles.state();
    assert_eq!(state.items.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1]);
    assert_eq!(state.total_count, 1);
}

#[tokio::test]
async fn test_detail_like_and_comments() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_json(5, &["rust"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/5/likes/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"liked": false})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/5/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                {"id": 10, "articleId": 5, "content": "first", "replies": [
                    {"id": 11, "articleId": 5, "parentId": 10, "content": "reply"}
                ]},
                {"id": 12, "articleId": 5, "content": "second"}
            ],
            "total": 2, "size": 20, "current": 1, "pages": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/articles/5/likes"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/articles/5/comments/11"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server, logged_in_storage("access-1", "refresh-1"));

    app.article.load(5).await.unwrap();
    let state = app.article.state();
    assert!(!state.liked);
    assert_eq!(state.comments.len(), 2);

    assert!(app.article.toggle_like().await.unwrap());
    let state = app.article.state();
    assert!(state.liked);
    assert_eq!(state.article.and_then(|a| a.like_count), Some(3));

    app.article.delete_comment(11).await.unwrap();
    let state = app.article.state();
    assert!(state.comments[0].replies.is_empty());
    assert_eq!(state.comment_total, 1);
}
