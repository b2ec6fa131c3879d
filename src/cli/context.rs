//! Shared state for command execution.

use anyhow::{Context, Result};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::sqlite::{initialize_configured_database, SqliteEventStore, SqliteStateStore};
use crate::domain::models::Config;
use crate::domain::ports::StaticSession;
use crate::services::RegulationService;

/// The regulation service as wired by the CLI.
pub type CliRegulationService = RegulationService<SqliteEventStore, SqliteStateStore>;

/// Loaded configuration plus the global flags every command sees.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub json: bool,
}

impl CommandContext {
    /// `--user` wins over `session.user_id`.
    pub fn new(config: Config, user: Option<Uuid>, project_id: Option<Uuid>, json: bool) -> Self {
        let user_id = user.or(config.session.user_id);
        Self {
            config,
            user_id,
            project_id,
            json,
        }
    }

    /// Open the configured database and wire the regulation service.
    pub async fn regulation_service(&self) -> Result<CliRegulationService> {
        let pool = initialize_configured_database(&self.config.database)
            .await
            .context("Failed to initialize database. Run 'keel init' first.")?;

        Ok(RegulationService::new(
            Arc::new(SqliteEventStore::new(pool.clone())),
            Arc::new(SqliteStateStore::new(pool)),
            Arc::new(StaticSession::new(self.user_id)),
            self.config.regulation.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::SessionConfig;

    #[test]
    fn test_cli_user_overrides_config() {
        let configured = Uuid::new_v4();
        let flagged = Uuid::new_v4();
        let config = Config {
            session: SessionConfig {
                user_id: Some(configured),
            },
            ..Config::default()
        };

        assert_eq!(CommandContext::new(config.clone(), None, None, false).user_id, Some(configured));
        assert_eq!(CommandContext::new(config, Some(flagged), None, false).user_id, Some(flagged));
    }
}
