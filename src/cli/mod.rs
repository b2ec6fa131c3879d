//! Command-line interface.

pub mod commands;
pub mod context;
pub mod display;
pub mod types;

pub use context::{CliRegulationService, CommandContext};
pub use types::{Cli, Commands};

use crate::domain::errors::DomainError;

/// Print `err` in the requested format and exit non-zero.
///
/// Exits with 2 when no user is configured, 1 otherwise.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let unauthenticated = matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::NotAuthenticated)
    );

    if json_mode {
        let payload = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).unwrap_or_default()
        );
    } else {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
        if unauthenticated {
            eprintln!("Set session.user_id in .keel/config.yaml, KEEL_SESSION__USER_ID, or pass --user.");
        }
    }

    std::process::exit(if unauthenticated { 2 } else { 1 });
}
