use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::MAX_TRUST_SCORE;

/// Project-local configuration directory
pub const CONFIG_DIR: &str = ".keel";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid window_days: {0}. Must be between 1 and 90")]
    InvalidWindowDays(u32),

    #[error("Invalid initial_trust_score: {0}. Must be between 0 and 100")]
    InvalidInitialTrustScore(u8),

    #[error("Invalid max_recompute_attempts: {0}. Cannot be 0")]
    InvalidRecomputeAttempts(u32),

    #[error("Invalid recent_events_limit: {0}. Cannot be 0")]
    InvalidRecentEventsLimit(u32),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .keel/config.yaml (project config, created by init)
    /// 3. .keel/local.yaml (project local overrides, optional)
    /// 4. Environment variables (KEEL_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(".")
    }

    /// Load configuration rooted at `base` instead of the working directory.
    pub fn load_from_dir(base: impl AsRef<Path>) -> Result<Config> {
        let dir = base.as_ref().join(CONFIG_DIR);

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed("KEEL_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let regulation = &config.regulation;
        if !(1..=90).contains(&regulation.window_days) {
            return Err(ConfigError::InvalidWindowDays(regulation.window_days));
        }

        if regulation.initial_trust_score > MAX_TRUST_SCORE {
            return Err(ConfigError::InvalidInitialTrustScore(
                regulation.initial_trust_score,
            ));
        }

        if regulation.max_recompute_attempts == 0 {
            return Err(ConfigError::InvalidRecomputeAttempts(
                regulation.max_recompute_attempts,
            ));
        }

        if regulation.recent_events_limit == 0 {
            return Err(ConfigError::InvalidRecentEventsLimit(
                regulation.recent_events_limit,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};
    use uuid::Uuid;

    fn write_project_file(dir: &TempDir, name: &str, contents: &str) {
        let config_dir = dir.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, ".keel/keel.db");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.regulation.window_days, 7);
        assert_eq!(config.regulation.initial_trust_score, 75);
        assert_eq!(config.regulation.recent_events_limit, 20);
        assert!(config.session.user_id.is_none());
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
database:
  path: /custom/path.db
  max_connections: 2
logging:
  level: debug
  format: json
regulation:
  window_days: 14
  initial_trust_score: 60
session:
  user_id: 0b4f7a3e-9c1d-4e8a-b2f6-5d3c8e1a7f90
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.database.path, "/custom/path.db");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.regulation.window_days, 14);
        assert_eq!(config.regulation.initial_trust_score, 60);
        assert_eq!(config.regulation.max_recompute_attempts, 3);
        assert_eq!(
            config.session.user_id,
            Some(Uuid::parse_str("0b4f7a3e-9c1d-4e8a-b2f6-5d3c8e1a7f90").unwrap())
        );

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "loud"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }

    #[test]
    fn test_validate_database() {
        let mut config = Config::default();
        config.database.path = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDatabasePath)
        ));

        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxConnections(0))
        ));
    }

    #[test]
    fn test_validate_window_days() {
        for days in [0, 91] {
            let mut config = Config::default();
            config.regulation.window_days = days;
            assert!(matches!(
                ConfigLoader::validate(&config),
                Err(ConfigError::InvalidWindowDays(d)) if d == days
            ));
        }

        let mut config = Config::default();
        config.regulation.window_days = 90;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_regulation_tuning() {
        let mut config = Config::default();
        config.regulation.initial_trust_score = 101;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidInitialTrustScore(101))
        ));

        let mut config = Config::default();
        config.regulation.max_recompute_attempts = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRecomputeAttempts(0))
        ));

        let mut config = Config::default();
        config.regulation.recent_events_limit = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRecentEventsLimit(0))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "regulation:\n  window_days: 3\nlogging:\n  level: info").unwrap();
        file.flush().unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.regulation.window_days, 3);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "regulation:\n  window_days: 0").unwrap();
        file.flush().unwrap();

        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_hierarchical_merging() {
        let dir = TempDir::new().unwrap();
        write_project_file(
            &dir,
            "config.yaml",
            "logging:\n  level: info\n  format: json\nregulation:\n  window_days: 10",
        );
        write_project_file(&dir, "local.yaml", "logging:\n  level: debug");

        temp_env::with_vars_unset(
            ["KEEL_LOGGING__LEVEL", "KEEL_REGULATION__WINDOW_DAYS"],
            || {
                let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
                assert_eq!(config.logging.level, "debug", "Local override should win");
                assert_eq!(
                    config.logging.format, "json",
                    "Base value should persist when not overridden"
                );
                assert_eq!(config.regulation.window_days, 10);
            },
        );
    }

    #[test]
    fn test_env_override() {
        let dir = TempDir::new().unwrap();
        write_project_file(&dir, "config.yaml", "regulation:\n  window_days: 10");

        temp_env::with_vars(
            [
                ("KEEL_REGULATION__WINDOW_DAYS", Some("5")),
                ("KEEL_SESSION__USER_ID", Some("a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8")),
            ],
            || {
                let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
                assert_eq!(config.regulation.window_days, 5);
                assert_eq!(
                    config.session.user_id,
                    Some(Uuid::parse_str("a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8").unwrap())
                );
            },
        );
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();

        temp_env::with_vars_unset(["KEEL_LOGGING__LEVEL", "KEEL_DATABASE__PATH"], || {
            let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
            assert_eq!(config.database.path, ".keel/keel.db");
            assert_eq!(config.logging.level, "warn");
        });
    }
}
