//! Client configuration from environment variables

use std::path::PathBuf;
use std::time::Duration;

/// Default API root
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/api";

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root; service prefixes (`/auth`, `/articles`, …) are appended
    pub api_base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Notification poll interval
    pub poll_interval: Duration,
    /// Notifications fetched per poll
    pub notification_limit: u32,
    /// Default article page size
    pub page_size: u32,
    /// Directory holding `session.json`
    pub home_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(30),
            notification_limit: 20,
            page_size: 10,
            home_dir: default_home_dir(),
        }
    }
}

fn default_home_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".blog-client"))
        .unwrap_or_else(|| PathBuf::from(".blog-client"))
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_base_url: std::env::var("BLOG_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base_url),
            request_timeout: env_parse::<u64>("BLOG_API_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            poll_interval: env_parse::<u64>("BLOG_NOTIFICATION_POLL_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            notification_limit: env_parse("BLOG_NOTIFICATION_LIMIT")
                .unwrap_or(defaults.notification_limit),
            page_size: env_parse("BLOG_PAGE_SIZE")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
            home_dir: std::env::var("BLOG_CLIENT_HOME")
                .map(PathBuf::from)
                .unwrap_or(defaults.home_dir),
        }
    }

    /// Config pointing at a specific API root, other values default
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }
}
