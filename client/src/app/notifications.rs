//! # Notification Controller
//!
//! Recent notifications for the logged-in user, newest first, with optional
//! background polling.

use async_channel::Sender;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use shared::Notification;

use super::events::AppEvent;
use super::publish;
use super::session::{SessionManager, SESSION_EXPIRED_MESSAGE};
use super::state::NotificationListState;
use super::tasks::polling::spawn_poller;
use crate::core::error::ApiError;
use crate::core::service::NotificationService;
use crate::services::storage::TokenStorage;

pub const DEFAULT_NOTIFICATION_LIMIT: u32 = 20;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

const FETCH_ERROR: &str = "Failed to load notifications, please try again later";
const MARK_READ_ERROR: &str = "Failed to mark notification as read, please try again later";
const MARK_ALL_READ_ERROR: &str = "Failed to mark all notifications as read, please try again later";

/// Shared handle to the notification list
#[derive(Clone)]
pub struct NotificationController {
    state: Arc<RwLock<NotificationListState>>,
    service: Arc<dyn NotificationService>,
    storage: Arc<dyn TokenStorage>,
    session: SessionManager,
    events: Sender<AppEvent>,
    poller: Arc<Mutex<Option<JoinHandle<()>>>>,
    limit: u32,
}

impl NotificationController {
    pub fn new(
        service: Arc<dyn NotificationService>,
        storage: Arc<dyn TokenStorage>,
        session: SessionManager,
        events: Sender<AppEvent>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(NotificationListState::default())),
            service,
            storage,
            session,
            events,
            poller: Arc::new(Mutex::new(None)),
            limit: DEFAULT_NOTIFICATION_LIMIT,
        }
    }

    /// Limit used by polling fetches
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn state(&self) -> NotificationListState {
        self.state.read().clone()
    }

    pub fn unread_count(&self) -> usize {
        self.state.read().unread_count()
    }

    /// Fetch up to `limit` notifications.
    ///
    /// Without a stored access token the list is cleared instead, which also
    /// stops polling.
    pub async fn fetch(&self, limit: u32, unread_only: bool) -> Result<(), ApiError> {
        if self.storage.access_token().is_none() {
            tracing::debug!("No access token, clearing notifications");
            self.clear();
            return Ok(());
        }

        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }

        let result = self
            .service
            .list_notifications(limit, unread_only)
            .await
            .and_then(normalize);

        match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), unread_only, "Notifications fetched");
                {
                    let mut state = self.state.write();
                    state.items = items;
                    state.last_fetched_at = Some(Utc::now());
                    state.loading = false;
                }
                publish(&self.events, AppEvent::NotificationsUpdated);
                Ok(())
            }
            Err(err) => {
                self.fail(&err, FETCH_ERROR);
                Err(err)
            }
        }
    }

    /// Mark one notification read; only that item changes locally.
    pub async fn mark_read(&self, notification_id: i64) -> Result<(), ApiError> {
        if let Err(err) = self.service.mark_read(notification_id).await {
            self.fail(&err, MARK_READ_ERROR);
            return Err(err);
        }

        {
            let mut state = self.state.write();
            if let Some(item) = state.items.iter_mut().find(|n| n.id == notification_id) {
                item.read = true;
            }
        }
        publish(&self.events, AppEvent::NotificationsUpdated);
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        if let Err(err) = self.service.mark_all_read().await {
            self.fail(&err, MARK_ALL_READ_ERROR);
            return Err(err);
        }

        for item in self.state.write().items.iter_mut() {
            item.read = true;
        }
        publish(&self.events, AppEvent::NotificationsUpdated);
        Ok(())
    }

    /// Poll every `interval`, replacing any running poller. The first fetch
    /// happens after one interval; fetch errors are swallowed.
    pub fn start_polling(&self, interval: Duration) {
        self.stop_polling();

        let controller = self.clone();
        let handle = spawn_poller(interval, move || {
            let controller = controller.clone();
            async move {
                let limit = controller.limit;
                if let Err(err) = controller.fetch(limit, false).await {
                    tracing::debug!(error = %err, "Notification poll failed");
                }
            }
        });

        *self.poller.lock() = Some(handle);
        tracing::info!(interval_ms = interval.as_millis() as u64, "Notification polling started");
    }

    pub fn stop_polling(&self) {
        if let Some(handle) = self.poller.lock().take() {
            handle.abort();
            tracing::info!("Notification polling stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.lock().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Stop polling and empty the list.
    pub fn clear(&self) {
        self.stop_polling();
        {
            let mut state = self.state.write();
            state.items.clear();
            state.error = None;
            state.last_fetched_at = None;
            state.loading = false;
        }
        publish(&self.events, AppEvent::NotificationsUpdated);
    }

    fn fail(&self, err: &ApiError, fallback: &str) {
        tracing::warn!(error = %err, "{}", fallback);
        {
            let mut state = self.state.write();
            state.loading = false;
            state.error = Some(err.server_message().unwrap_or(fallback).to_string());
        }
        if err.is_unauthorized() {
            self.session.handle_session_expired(SESSION_EXPIRED_MESSAGE);
        }
        publish(&self.events, AppEvent::NotificationsUpdated);
    }
}

/// Accept an array, a single object or null; sort newest first.
pub(crate) fn normalize(body: Value) -> Result<Vec<Notification>, ApiError> {
    let mut items: Vec<Notification> = match body {
        Value::Null => Vec::new(),
        Value::Array(_) => serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?,
        Value::Object(_) => {
            vec![serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?]
        }
        other => {
            return Err(ApiError::Decode(format!(
                "Unexpected notification payload: {}",
                other
            )))
        }
    };

    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_sorts_newest_first() {
        let items = normalize(json!([
            {"id": 1, "createdAt": "2024-05-01T10:00:00"},
            {"id": 2, "createdAt": "2024-05-03T10:00:00"},
            {"id": 3},
            {"id": 4, "createdAt": "2024-05-02T10:00:00"}
        ]))
        .unwrap();
        assert_eq!(items.iter().map(|n| n.id).collect::<Vec<_>>(), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_normalize_single_and_empty() {
        assert_eq!(normalize(json!({"id": 7, "read": true})).unwrap().len(), 1);
        assert!(normalize(Value::Null).unwrap().is_empty());
        assert!(normalize(json!([])).unwrap().is_empty());
        assert!(matches!(normalize(json!("text")), Err(ApiError::Decode(_))));
    }
}
