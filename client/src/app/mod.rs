//! # Application Layer
//!
//! The [`App`] bundle wires the controllers to the service clients and to a
//! shared event channel.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Caller (CLI / UI)                                          │
//! │  - invokes controller actions                               │
//! │  - drains AppEvent and re-reads controller state            │
//! └────────────┬───────────────────────────────▲────────────────┘
//!              │ async fn                      │ async_channel
//!              │                               │ (bounded)
//! ┌────────────▼───────────────────────────────┴────────────────┐
//! │  Controllers (each: Arc<RwLock<State>>)                     │
//! │  - SessionManager        tokens + identity                  │
//! │  - ArticleListController page + filters                     │
//! │  - ArticleDetailController article + likes + comments       │
//! │  - NotificationController list + poll task                  │
//! │  - RouteGuard            protected navigation               │
//! └────────────┬────────────────────────────────────────────────┘
//!              │ Arc<dyn …Service>
//! ┌────────────▼────────────────────────────────────────────────┐
//! │  services::api clients ──► REST backend                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Management Pattern
//!
//! Locks are never held across an `.await`: a controller takes the lock,
//! copies what it needs, releases it, awaits the service, then takes the
//! lock again to apply the result. Two overlapping fetches of the same list
//! race and the last one to resolve wins.
//!
//! Any 401 reaching a controller is handed to
//! [`SessionManager::handle_session_expired`].
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use blog_client::app::App;
//! use blog_client::config::ClientConfig;
//! use blog_client::services::storage::MemoryStorage;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let app = App::new(&ClientConfig::from_env(), Arc::new(MemoryStorage::new()));
//! app.session.login("alice", "secret").await?;
//! app.articles.go_to_page(1).await?;
//! for article in app.articles.state().items {
//!     println!("{}", article.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod article_detail;
pub mod articles;
pub mod events;
pub mod notifications;
pub mod router;
pub mod session;
pub mod state;
pub mod tasks;

pub use article_detail::ArticleDetailController;
pub use articles::ArticleListController;
pub use events::AppEvent;
pub use notifications::NotificationController;
pub use router::{Navigation, Route, RouteGuard};
pub use session::SessionManager;
pub use state::*;

use async_channel::{Receiver, Sender};
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::services::api::ApiClients;
use crate::services::storage::TokenStorage;

/// Events buffered for a caller that is not draining `App::events`; newer
/// events are dropped once it is full.
pub const EVENT_CAPACITY: usize = 256;

/// Controllers sharing one session, one token store and one event channel
#[derive(Clone)]
pub struct App {
    pub session: SessionManager,
    pub articles: ArticleListController,
    pub article: ArticleDetailController,
    pub notifications: NotificationController,
    pub router: RouteGuard,
    pub events: Receiver<AppEvent>,
}

impl App {
    /// Build every controller against the configured backend.
    pub fn new(config: &ClientConfig, storage: Arc<dyn TokenStorage>) -> Self {
        let clients = ApiClients::new(config, storage.clone());
        Self::with_clients(config, storage, clients)
    }

    pub fn with_clients(config: &ClientConfig, storage: Arc<dyn TokenStorage>, clients: ApiClients) -> Self {
        let (event_tx, event_rx) = async_channel::bounded(EVENT_CAPACITY);

        let session = SessionManager::new(storage.clone(), clients.auth, clients.users, event_tx.clone());
        let articles = ArticleListController::new(
            clients.articles.clone(),
            session.clone(),
            event_tx.clone(),
            config.page_size,
        );
        let article = ArticleDetailController::new(clients.articles, session.clone(), event_tx.clone());
        let notifications = NotificationController::new(clients.notifications, storage, session.clone(), event_tx)
            .with_limit(config.notification_limit);
        let router = RouteGuard::new(session.clone());

        Self {
            session,
            articles,
            article,
            notifications,
            router,
            events: event_rx,
        }
    }
}

/// Publish without blocking. Events are dropped when the buffer is full or
/// nobody listens.
pub(crate) fn publish(events: &Sender<AppEvent>, event: AppEvent) {
    match events.try_send(event) {
        Ok(()) => {}
        Err(async_channel::TrySendError::Full(event)) => {
            tracing::trace!(?event, "Event buffer full, dropping event");
        }
        Err(async_channel::TrySendError::Closed(_)) => {
            tracing::trace!("Event channel closed, dropping event");
        }
    }
}
