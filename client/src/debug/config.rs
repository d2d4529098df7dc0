//! Logging configuration from environment variables

use std::path::PathBuf;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "blog_client=info,warn";

/// Log file name prefix; the appender adds the date suffix
pub const LOG_FILE_NAME: &str = "blog-client.log";

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Directory for the daily-rotated log file
    pub log_dir: PathBuf,
    /// Filter directives (e.g., "blog_client=debug,info")
    pub log_level: String,
    /// Mirror events to stderr
    pub log_to_stderr: bool,
    /// Write the file log as JSON lines
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_to_stderr: false,
            json: false,
        }
    }
}

fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".blog-client").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            log_dir: std::env::var("BLOG_CLIENT_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: std::env::var("RUST_LOG")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_level),
            log_to_stderr: env_flag("BLOG_CLIENT_LOG_STDERR").unwrap_or(defaults.log_to_stderr),
            json: env_flag("BLOG_CLIENT_LOG_JSON").unwrap_or(defaults.json),
        }
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(!config.log_to_stderr);
        assert!(config.log_dir.ends_with("logs"));
        assert!(!config.is_debug_enabled());
    }
}
