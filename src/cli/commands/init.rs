//! Implementation of the `keel init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::adapters::sqlite::initialize_database;
use crate::cli::context::CommandContext;
use crate::cli::display::{output, CommandOutput};
use crate::domain::models::{Config, SessionConfig};
use crate::infrastructure::config::CONFIG_DIR;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub directories_created: Vec<String>,
    pub config_written: bool,
    pub database_initialized: bool,
    pub user_id: Option<Uuid>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if !self.directories_created.is_empty() {
            lines.push("\nCreated directories:".to_string());
            for dir in &self.directories_created {
                lines.push(format!("  - {dir}"));
            }
        }
        if self.config_written {
            lines.push(format!("\nConfiguration written to {CONFIG_DIR}/config.yaml"));
        }
        if self.database_initialized {
            lines.push(format!("Database initialized at {CONFIG_DIR}/keel.db"));
        }
        if let Some(user_id) = self.user_id {
            lines.push(format!("Acting as user {user_id}"));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, ctx: &CommandContext) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let keel_dir = target_path.join(CONFIG_DIR);

    if keel_dir.exists() && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path,
            directories_created: vec![],
            config_written: false,
            database_initialized: false,
            user_id: None,
        };
        output(&output_data, ctx.json);
        return Ok(());
    }

    if args.force && keel_dir.exists() {
        fs::remove_dir_all(&keel_dir)
            .await
            .context("Failed to remove existing .keel directory")?;
    }

    let mut directories_created = vec![];
    for dir in [keel_dir.clone(), keel_dir.join("logs")] {
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            let relative = dir
                .strip_prefix(&target_path)
                .unwrap_or(&dir)
                .to_string_lossy()
                .to_string();
            directories_created.push(relative);
        }
    }

    let user_id = ctx.user_id.unwrap_or_else(Uuid::new_v4);
    write_project_config(&keel_dir, user_id).await?;

    let db_url = format!("sqlite:{}", keel_dir.join("keel.db").display());
    initialize_database(&db_url, None)
        .await
        .context("Failed to initialize database")?;

    tracing::info!(path = %target_path.display(), %user_id, "initialized keel project");

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        directories_created,
        config_written: true,
        database_initialized: true,
        user_id: Some(user_id),
    };

    output(&output_data, ctx.json);
    Ok(())
}

/// Project config seeded by init: defaults plus a session user and file logging.
pub fn initial_config(user_id: Uuid) -> Config {
    let mut config = Config {
        session: SessionConfig {
            user_id: Some(user_id),
        },
        ..Config::default()
    };
    config.logging.log_dir = Some(format!("{CONFIG_DIR}/logs"));
    config
}

async fn write_project_config(keel_dir: &Path, user_id: Uuid) -> Result<()> {
    let yaml = serde_yaml::to_string(&initial_config(user_id))
        .context("Failed to serialize default configuration")?;
    let path = keel_dir.join("config.yaml");
    fs::write(&path, yaml)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
