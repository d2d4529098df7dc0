//! # Application Events
//!
//! Change notifications published by the controllers. Events carry no payload
//! beyond what a subscriber needs to decide what to re-read; the state itself
//! is read from the controller that sent them.

/// Controller output sent to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Tokens or identity changed (login, refresh, profile, logout)
    SessionChanged,
    /// Credentials were rejected and the session was torn down
    SessionExpired { message: String },
    /// Login prompt opened (`true`) or closed (`false`)
    LoginPrompt(bool),
    /// Article list page or filters changed
    ArticlesUpdated,
    /// Tag catalogue loaded
    TagsUpdated,
    /// Article detail, like status or comments changed
    ArticleDetailUpdated,
    /// Notification list changed
    NotificationsUpdated,
}
