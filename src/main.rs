//! Keel CLI entry point.

use anyhow::Context;
use clap::Parser;

use keel::cli::commands;
use keel::cli::{Cli, CommandContext, Commands};
use keel::infrastructure::config::ConfigLoader;
use keel::infrastructure::logging::{prune_old_logs, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        keel::cli::handle_error(err, json);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("Failed to load configuration")?;
    let _logger = LoggerImpl::init(&config.logging).context("Failed to initialize logging")?;

    if let Some(log_dir) = &config.logging.log_dir {
        if let Err(err) = prune_old_logs(log_dir, config.logging.retention_days).await {
            tracing::warn!(error = %err, "log retention cleanup failed");
        }
    }

    let ctx = CommandContext::new(config, cli.user, cli.project, cli.json);

    match cli.command {
        Commands::Init(args) => commands::init::execute(args, &ctx).await,
        Commands::State => commands::state::execute(&ctx).await,
        Commands::Log(args) => commands::log::execute(args, &ctx).await,
        Commands::Recompute => commands::recompute::execute(&ctx).await,
        Commands::Check(args) => commands::check::execute(args, &ctx).await,
        Commands::Override => commands::override_cmd::execute(&ctx).await,
        Commands::Events(args) => commands::events::execute(args, &ctx).await,
        Commands::Levels => commands::levels::execute(&ctx),
        Commands::Enforcement(args) => commands::enforcement::execute(args, &ctx).await,
    }
}
