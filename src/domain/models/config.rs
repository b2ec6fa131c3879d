use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Main configuration structure for Keel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scoring and policy tuning
    #[serde(default)]
    pub regulation: RegulationConfig,

    /// Identity of the acting user
    #[serde(default)]
    pub session: SessionConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".keel/keel.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// sqlx connection URL for the configured path.
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Number of days to retain logs
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

const fn default_retention_days() -> u32 {
    30
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            retention_days: default_retention_days(),
        }
    }
}

/// Scoring and policy tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegulationConfig {
    /// Length of the trailing event window in days
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Trust score given to a newly seeded state (0-100)
    #[serde(default = "default_initial_trust_score")]
    pub initial_trust_score: u8,

    /// Default number of events returned by recent-event queries
    #[serde(default = "default_recent_events_limit")]
    pub recent_events_limit: u32,

    /// Attempts at a recompute before a version conflict is surfaced
    #[serde(default = "default_max_recompute_attempts")]
    pub max_recompute_attempts: u32,
}

const fn default_window_days() -> u32 {
    7
}

const fn default_initial_trust_score() -> u8 {
    75
}

const fn default_recent_events_limit() -> u32 {
    20
}

const fn default_max_recompute_attempts() -> u32 {
    3
}

impl Default for RegulationConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            initial_trust_score: default_initial_trust_score(),
            recent_events_limit: default_recent_events_limit(),
            max_recompute_attempts: default_max_recompute_attempts(),
        }
    }
}

/// Identity of the acting user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionConfig {
    /// User the CLI acts as; commands fail as unauthenticated when unset
    #[serde(default)]
    pub user_id: Option<Uuid>,
}
