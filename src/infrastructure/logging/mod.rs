//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Pretty or JSON console output on stderr
//! - Daily rolling JSON log files
//! - Retention cleanup for rolled files

pub mod logger;
pub mod retention;

pub use logger::{LoggerImpl, LOG_FILE_NAME};
pub use retention::prune_old_logs;
