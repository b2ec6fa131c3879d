//! CLI type definitions
//!
//! Clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use uuid::Uuid;

use super::commands::check::CheckArgs;
use super::commands::enforcement::EnforcementArgs;
use super::commands::events::EventsArgs;
use super::commands::init::InitArgs;
use super::commands::log::LogArgs;

#[derive(Parser, Debug)]
#[command(name = "keel")]
#[command(about = "Keel - trust-score regulation for focused work", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Act as this user instead of `session.user_id` from the config
    #[arg(short, long, global = true)]
    pub user: Option<Uuid>,

    /// Scope to a master project; omit for the user's global standing
    #[arg(short, long, global = true)]
    pub project: Option<Uuid>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Keel configuration and database
    Init(InitArgs),

    /// Show the current trust score and strictness level
    State,

    /// Log a behavioral event and recompute the score
    Log(LogArgs),

    /// Recompute the score from the trailing event window
    Recompute,

    /// Check whether an action is allowed at the current level
    Check(CheckArgs),

    /// Spend today's override
    Override,

    /// List recent regulation events
    Events(EventsArgs),

    /// List the strictness levels and their score bands
    Levels,

    /// Show the behavior gates for a level
    Enforcement(EnforcementArgs),
}
