//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the blog client and the backend
//! services (auth, user/notification, article). All DTOs use JSON serialization
//! via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Login, registration, tokens and user profiles
//!   - **[`dto::article`]**: Articles, tags, likes, pagination
//!   - **[`dto::comment`]**: Article comments
//!   - **[`dto::notification`]**: User notifications
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::timestamp`]**: Lenient `serde` adapter for backend timestamps
//!   - **[`utils::truncate_text`]**: Shorten text for display
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shared::dto::auth::{LoginRequest, TokenPair};
//!
//! # async fn run() -> Result<(), reqwest::Error> {
//! let request = LoginRequest {
//!     username: "alice".to_string(),
//!     password: "secret1".to_string(),
//! };
//!
//! let tokens: TokenPair = reqwest::Client::new()
//!     .post("http://127.0.0.1:8080/api/auth/login")
//!     .json(&request)
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod dto;
pub mod utils;

// Wildcard re-exports: everything in a DTO library is public API
pub use dto::*;
pub use utils::*;
