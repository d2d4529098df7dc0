//! # Common Error Types
//!
//! Consolidated error handling for the blog client.
//!
//! ## Error Categories
//!
//! - [`ApiError`]: one failed HTTP exchange, classified by cause
//!   (transport, 401, 400 with field messages, 404, other server failure,
//!   undecodable body)
//! - [`AuthError`]: session-level outcome of login/register/refresh, mapped
//!   from [`ApiError`] into user-facing messages
//! - [`StorageError`]: durable token storage failures
//! - [`AppError`]: crate-wide umbrella with `From` conversions from all of the
//!   above
//!
//! ## Usage Pattern
//!
//! ```rust
//! use blog_client::core::error::{ApiError, AppError};
//!
//! fn check(limit: usize) -> Result<usize, AppError> {
//!     if limit == 0 {
//!         return Err(AppError::Validation("limit must be positive".to_string()));
//!     }
//!     Ok(limit)
//! }
//!
//! let err: AppError = ApiError::NotFound("article 7".to_string()).into();
//! assert_eq!(err.to_string(), "API error: Not found: article 7");
//! ```

use reqwest::StatusCode;
use shared::ErrorResponse;
use thiserror::Error;

/// Failure of a single REST call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, DNS, TLS.
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 401. Credentials missing, expired or revoked.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP 400 with the server's field messages, surfaced verbatim.
    #[error("{0}")]
    Validation(String),

    /// HTTP 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Success status but the body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success response.
    pub fn from_status(status: StatusCode, body: Option<&ErrorResponse>) -> Self {
        let message = body.and_then(ErrorResponse::best_message).map(str::to_string);
        match status {
            StatusCode::BAD_REQUEST => {
                ApiError::Validation(message.unwrap_or_else(|| "Invalid request".to_string()))
            }
            StatusCode::UNAUTHORIZED => {
                ApiError::Unauthorized(message.unwrap_or_else(|| "Unauthorized".to_string()))
            }
            StatusCode::NOT_FOUND => {
                ApiError::NotFound(message.unwrap_or_else(|| "Resource not found".to_string()))
            }
            other => ApiError::Server {
                status: other.as_u16(),
                message: message.unwrap_or_else(|| {
                    other.canonical_reason().unwrap_or("Unexpected response").to_string()
                }),
            },
        }
    }

    /// HTTP status behind this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Validation(_) => Some(400),
            ApiError::NotFound(_) => Some(404),
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Message carried by a response the server actually sent.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Validation(message)
            | ApiError::NotFound(message)
            | ApiError::Server { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Session-level authentication failure, carrying the user-facing message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User does not exist")]
    UserNotFound,

    /// Transport failure; the detail is kept for logs only.
    #[error("Login failed, please check your network connection")]
    Network(String),

    /// Field validation message, shown verbatim.
    #[error("{0}")]
    Validation(String),

    /// Credentials were rejected mid-session and the session was torn down.
    #[error("{0}")]
    SessionExpired(String),

    /// Tokens could not be persisted.
    #[error("Failed to save session: {0}")]
    Storage(String),

    /// Everything else, already phrased for the user.
    #[error("{0}")]
    Failed(String),
}

impl AuthError {
    /// Map a failed `POST /auth/login`.
    pub fn from_login(err: &ApiError) -> Self {
        match err {
            ApiError::Unauthorized(_) => AuthError::InvalidCredentials,
            ApiError::NotFound(_) => AuthError::UserNotFound,
            ApiError::Validation(message) => AuthError::Validation(message.clone()),
            ApiError::Network(detail) => AuthError::Network(detail.clone()),
            ApiError::Server { .. } | ApiError::Decode(_) => {
                AuthError::Failed("Login failed, please try again later".to_string())
            }
        }
    }

    /// Map a failed `POST /users/register`.
    pub fn from_register(err: &ApiError) -> Self {
        match err {
            ApiError::Validation(message) => AuthError::Validation(message.clone()),
            ApiError::Network(detail) => AuthError::Network(detail.clone()),
            _ => AuthError::Failed("Registration failed, please try again later".to_string()),
        }
    }
}

/// Durable token storage failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt storage file: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        AuthError::Storage(err.to_string())
    }
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn body(message: &str) -> ErrorResponse {
        ErrorResponse {
            message: Some(message.to_string()),
            error: None,
        }
    }

    #[test]
    fn test_from_status_classifies() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, Some(&body("username: too short")));
        assert_eq!(err, ApiError::Validation("username: too short".to_string()));

        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, None);
        assert!(err.is_unauthorized());

        let err = ApiError::from_status(StatusCode::NOT_FOUND, None);
        assert_eq!(err.status(), Some(404));

        let err = ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, None);
        assert_eq!(
            err,
            ApiError::Server {
                status: 503,
                message: "Service Unavailable".to_string()
            }
        );
    }

    #[test]
    fn test_login_mapping() {
        assert_eq!(
            AuthError::from_login(&ApiError::Unauthorized("Bad credentials".to_string())),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            AuthError::from_login(&ApiError::NotFound("x".to_string())),
            AuthError::UserNotFound
        );
        assert_eq!(
            AuthError::from_login(&ApiError::Validation("Password cannot be blank".to_string()))
                .to_string(),
            "Password cannot be blank"
        );
        assert!(matches!(
            AuthError::from_login(&ApiError::Network("refused".to_string())),
            AuthError::Network(_)
        ));
        assert_eq!(
            AuthError::from_login(&ApiError::Server {
                status: 500,
                message: "boom".to_string()
            })
            .to_string(),
            "Login failed, please try again later"
        );
    }

    #[test]
    fn test_register_mapping_keeps_field_messages() {
        let err = AuthError::from_register(&ApiError::Validation(
            "username: Username must be between 3 and 50 characters".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "username: Username must be between 3 and 50 characters"
        );

        let err = AuthError::from_register(&ApiError::Server {
            status: 409,
            message: "exists".to_string(),
        });
        assert_eq!(err.to_string(), "Registration failed, please try again later");
    }
}
