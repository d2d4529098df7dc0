//! Notification controller against a mocked notification service.

mod common;

use common::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use blog_client::services::storage::MemoryStorage;

#[tokio::test]
async fn test_fetch_sorts_newest_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications/me"))
        .and(query_param("limit", "20"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "type": "ARTICLE_LIKED", "read": true, "createdAt": "2024-05-01T08:00:00"},
            {"id": 2, "type": "ARTICLE_COMMENTED", "read": false, "createdAt": "2024-05-03T08:00:00"},
            {"id": 3, "type": "COMMENT_REPLIED", "read": false, "createdAt": "2024-05-02T08:00:00"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server, logged_in_storage("access-1", "refresh-1"));
    app.notifications.fetch(20, false).await.unwrap();

    let state = app.notifications.state();
    assert_eq!(state.items.iter().map(|n| n.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    assert_eq!(state.unread_count(), 2);
    assert!(state.last_fetched_at.is_some());
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_unread_only_and_single_object_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications/me"))
        .and(query_param("unreadOnly", "true"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9, "read": false})))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server, logged_in_storage("access-1", "refresh-1"));
    app.notifications.fetch(5, true).await.unwrap();
    assert_eq!(app.notifications.state().items.len(), 1);
}

#[tokio::test]
async fn test_no_token_clears_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_for(&server, Arc::new(MemoryStorage::new()));
    app.notifications.fetch(20, false).await.unwrap();
    assert!(app.notifications.state().items.is_empty());
}

#[tokio::test]
async fn test_mark_read_changes_only_that_item() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "read": false, "createdAt": "2024-05-01T08:00:00"},
            {"id": 2, "read": false, "createdAt": "2024-05-02T08:00:00"},
            {"id": 3, "read": true, "createdAt": "2024-05-03T08:00:00"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/notifications/2/read"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/notifications/read-all"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server, logged_in_storage("access-1", "refresh-1"));
    app.notifications.fetch(20, false).await.unwrap();
    let before = app.notifications.state();

    app.notifications.mark_read(2).await.unwrap();
    let after = app.notifications.state();
    for (old, new) in before.items.iter().zip(after.items.iter()) {
        if new.id == 2 {
            assert!(new.read);
        } else {
            assert_eq!(old, new);
        }
    }
    assert_eq!(after.unread_count(), 1);

    app.notifications.mark_all_read().await.unwrap();
    assert_eq!(app.notifications.unread_count(), 0);
}

#[tokio::test]
async fn test_mark_read_failure_keeps_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/notifications/4/read"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Notification not found"})))
        .mount(&server)
        .await;

    let app = app_for(&server, logged_in_storage("access-1", "refresh-1"));
    assert!(app.notifications.mark_read(4).await.is_err());
    assert_eq!(app.notifications.state().error.as_deref(), Some("Notification not found"));
}

#[tokio::test]
async fn test_unauthorized_fetch_expires_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server, logged_in_storage("access-1", "refresh-1"));
    assert!(app.notifications.fetch(20, false).await.is_err());
    assert!(!app.session.is_authenticated());
    assert_eq!(count_expired(&drain(&app)), 1);
}

#[tokio::test]
async fn test_polling_fetches_until_stopped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications/me"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2..)
        .mount(&server)
        .await;

    let app = app_for(&server, logged_in_storage("access-1", "refresh-1"));

    app.notifications.start_polling(Duration::from_millis(50));
    // Restarting replaces the running poller
    app.notifications.start_polling(Duration::from_millis(50));
    assert!(app.notifications.is_polling());

    tokio::time::sleep(Duration::from_millis(300)).await;
    app.notifications.stop_polling();
    assert!(!app.notifications.is_polling());

    // Errors were swallowed and the session survives a 500
    assert!(app.session.is_authenticated());
}

#[tokio::test]
async fn test_clear_stops_polling_and_empties() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .mount(&server)
        .await;

    let app = app_for(&server, logged_in_storage("access-1", "refresh-1"));
    app.notifications.fetch(20, false).await.unwrap();
    app.notifications.start_polling(Duration::from_secs(60));

    app.notifications.clear();
    let state = app.notifications.state();
    assert!(!app.notifications.is_polling());
    assert!(state.items.is_empty());
    assert!(state.last_fetched_at.is_none());
}
