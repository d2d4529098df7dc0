//! # Blog Client - Library Root
//!
//! Async client SDK for the blog platform's REST backend, plus the
//! `blog-client` command-line front end built on it.
//!
//! ## Features
//!
//! - **Session management**: Login, registration, token refresh, logout and
//!   profile enrichment, persisted across runs
//! - **Article browsing**: Paginated list with status, tag, keyword and
//!   author filters; article detail with likes and comments
//! - **Notifications**: Sorted notification list with read bookkeeping and
//!   background polling
//! - **Route guard**: Authentication check for protected navigation targets
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              blog-client (this crate)                  │
//! ├────────────────────────────────────────────────────────┤
//! │  Tokio         - Async runtime                         │
//! │  Reqwest       - HTTP client                           │
//! │  async-channel - Controller → caller events            │
//! │  tracing       - Structured logging                    │
//! └────────────────────────────────────────────────────────┘
//!          │ HTTP/JSON + Bearer token
//!          ▼
//! ┌──────────────────────────────────────────────┐
//! │  Backend: auth, user/notification, article   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: Controllers, their state and the event channel
//! - **config**: Client configuration from the environment
//! - **core**: Error types and service traits
//! - **debug**: Logging setup
//! - **services**: HTTP clients and token storage
//! - **utils**: Token claim decoding and input validation
//!
//! ```text
//! main.rs
//!   │
//!   └── app (controllers, events)
//!       ├── core::service traits
//!       │   └── services::api (HTTP requests)
//!       └── services::storage (session persistence)
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod services;
pub mod utils;

pub use app::{App, AppEvent};
pub use config::ClientConfig;
pub use crate::core::error::{ApiError, AppError, AuthError, Result, StorageError};
