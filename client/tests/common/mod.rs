//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

use blog_client::app::{App, AppEvent};
use blog_client::config::ClientConfig;
use blog_client::services::storage::{MemoryStorage, ACCESS_TOKEN_KEY, AUTH_USER_KEY, REFRESH_TOKEN_KEY};

/// Unsigned access token carrying `sub` and `userId` claims
pub fn fake_jwt(username: &str, user_id: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = URL_SAFE_NO_PAD.encode(
        json!({ "sub": username, "userId": user_id, "exp": 4_102_444_800i64 }).to_string(),
    );
    format!("{}.{}.signature", header, claims)
}

pub fn token_pair(access: &str, refresh: &str) -> Value {
    json!({ "accessToken": access, "refreshToken": refresh, "tokenType": "Bearer" })
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        request_timeout: Duration::from_secs(5),
        ..ClientConfig::with_base_url(format!("{}/api", server.uri()))
    }
}

/// Storage holding a logged-in session for user 7 ("alice")
pub fn logged_in_storage(access: &str, refresh: &str) -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::with_values([
        (ACCESS_TOKEN_KEY, access),
        (REFRESH_TOKEN_KEY, refresh),
        (AUTH_USER_KEY, r#"{"id":7,"username":"alice"}"#),
    ]))
}

pub fn app_for(server: &MockServer, storage: Arc<MemoryStorage>) -> App {
    App::new(&config_for(server), storage)
}

/// Drain everything published so far.
pub fn drain(app: &App) -> Vec<AppEvent> {
    std::iter::from_fn(|| app.events.try_recv().ok()).collect()
}

pub fn count_expired(events: &[AppEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, AppEvent::SessionExpired { .. }))
        .count()
}

pub fn article_json(id: i64, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "authorId": 7,
        "title": format!("Article {}", id),
        "summary": "summary",
        "status": "PUBLISHED",
        "createdAt": "2024-05-01T10:00:00",
        "likeCount": 2,
        "tags": tags.iter().enumerate().map(|(i, t)| json!({"id": i + 1, "name": t})).collect::<Vec<_>>(),
    })
}

pub fn page_json(records: Vec<Value>, total: u64, current: u32, pages: u32) -> Value {
    json!({ "records": records, "total": total, "size": 10, "current": current, "pages": pages })
}
