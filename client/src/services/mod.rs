//! # Services Module
//!
//! External integrations of the blog client.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    blog-client                           │
//! │                                                          │
//! │  controllers (app/) ──► service traits (core/service)    │
//! │                              │                           │
//! │                              ▼                           │
//! │  ┌─────────────────────────────────────────────┐         │
//! │  │ ApiClients (api/)                           │◄─┐      │
//! │  │ AuthClient UserClient ArticleClient         │  │token │
//! │  │ NotificationClient                          │  │      │
//! │  └──────────────────────┬──────────────────────┘  │      │
//! │                         │             TokenStorage│      │
//! │                         │             (storage.rs)┘      │
//! └─────────────────────────┼────────────────────────────────┘
//!                           │ HTTP/JSON, Bearer auth
//!                           ▼
//!   /api/auth/*   /api/users/*   /api/articles/*   /api/notifications/*
//! ```
//!
//! ## Error Handling
//!
//! Every client method returns `Result<T, ApiError>`:
//! - `ApiError::Network` - transport failures
//! - `ApiError::Unauthorized` - 401, handed to the session manager by callers
//! - `ApiError::Validation` - 400 with the server's message
//! - `ApiError::NotFound` / `ApiError::Server` - other statuses
//! - `ApiError::Decode` - unexpected response body

pub mod api;
pub mod storage;
