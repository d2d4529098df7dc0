//! # Data Transfer Objects (DTOs)
//!
//! Data structures exchanged with the blog backend services over the REST API.
//!
//! ## Module Organization
//!
//! - [`auth`] - Login, registration, token pairs, user profiles, error bodies
//! - [`article`] - Articles, tags, like status and the paginated envelope
//! - [`comment`] - Article comments
//! - [`notification`] - User notifications
//!
//! ## Serialization Format
//!
//! The backend is a set of Spring services, so the wire format differs from
//! Rust naming:
//!
//! - **Field naming**: camelCase on the wire (`#[serde(rename_all = "camelCase")]`)
//! - **Optional fields**: tolerated when missing (`#[serde(default)]`), omitted
//!   from requests when `None`
//! - **Enums**: UPPERCASE strings (`PUBLISHED`, `DRAFT`)
//! - **Timestamps**: ISO-8601 local date-times, see [`crate::utils::timestamp`]
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/auth/login
//! Content-Type: application/json
//!
//! {"username": "alice", "password": "secret1"}
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! {
//!   "accessToken": "eyJhbGciOiJIUzI1NiJ9...",
//!   "refreshToken": "eyJhbGciOiJIUzI1NiJ9...",
//!   "tokenType": "Bearer"
//! }
//! ```

pub mod article;
pub mod auth;
pub mod comment;
pub mod notification;

pub use article::*;
pub use auth::*;
pub use comment::*;
pub use notification::*;
