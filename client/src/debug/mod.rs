//! # Logging Infrastructure
//!
//! - **File-based logging**: Structured logs to `<log_dir>/blog-client.log.<date>` (daily rotation)
//! - **Stderr mirror**: Compact console output for the CLI
//! - **Panic hook**: Panics are recorded through `tracing` before the default handler runs
//!
//! ## Usage
//!
//! ```rust,no_run
//! use blog_client::debug::{self, LogConfig};
//!
//! let _guard = debug::init_logger(&LogConfig::from_env());
//! tracing::info!(endpoint = "/articles", duration_ms = 12, "API call completed");
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: `blog_client=info,warn`)
//! - `BLOG_CLIENT_LOG_DIR`: Log directory (default: `~/.blog-client/logs`)
//! - `BLOG_CLIENT_LOG_STDERR`: Mirror logs to stderr (1=on)
//! - `BLOG_CLIENT_LOG_JSON`: JSON lines in the log file (1=on)

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use logger::{init as init_logger, LoggerGuard};
