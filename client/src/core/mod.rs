//! # Core Abstractions
//!
//! Core traits and error types used throughout the client.
//!
//! - **[`error`]**: Error types (`ApiError`, `AuthError`, `StorageError`, `AppError`, `Result<T>`)
//! - **[`service`]**: Service traits for dependency injection (`AuthService`,
//!   `UserService`, `ArticleService`, `NotificationService`)
//!
//! ## Dependency Injection
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use blog_client::core::service::ArticleService;
//!
//! // In production: the HTTP client
//! let api: Arc<dyn ArticleService> = Arc::new(api_client);
//!
//! // In tests: a mock implementation
//! let api: Arc<dyn ArticleService> = Arc::new(MockArticles::default());
//! ```

pub mod error;
pub mod service;

pub use error::{ApiError, AppError, AuthError, Result, StorageError};
pub use service::{ArticleService, AuthService, NotificationService, UserService};
