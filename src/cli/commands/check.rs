//! `keel check`: ask whether an action is allowed right now.

use anyhow::Result;
use clap::Args;

use crate::cli::context::CommandContext;
use crate::cli::display::{action_failure, action_success, colorize_level, output, CommandOutput};
use crate::domain::errors::DomainError;
use crate::domain::models::{BehaviorCheck, Capability};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// add_task, open_exploration, start_side_project, reschedule_deadline or skip_focus_session
    pub capability: String,
}

#[derive(Debug, serde::Serialize)]
pub struct CheckOutput {
    #[serde(flatten)]
    pub check: BehaviorCheck,
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let check = &self.check;
        if check.allowed {
            action_success(&format!(
                "{} is allowed at level {}",
                check.capability,
                colorize_level(check.level)
            ))
        } else {
            action_failure(check.message.as_deref().unwrap_or("Not allowed"))
        }
    }
}

pub fn parse_capability(raw: &str) -> Result<Capability, DomainError> {
    Capability::from_str(raw).ok_or_else(|| {
        let valid: Vec<_> = Capability::ALL.iter().map(Capability::as_str).collect();
        DomainError::ValidationFailed(format!(
            "Unknown capability '{raw}'. Valid capabilities: {}",
            valid.join(", ")
        ))
    })
}

pub async fn execute(args: CheckArgs, ctx: &CommandContext) -> Result<()> {
    let capability = parse_capability(&args.capability)?;

    let service = ctx.regulation_service().await?;
    let check = service.check_behavior_allowed(capability, ctx.project_id).await?;

    output(&CheckOutput { check }, ctx.json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{BehaviorEnforcement, StrictnessLevel};

    #[test]
    fn test_parse_capability() {
        assert_eq!(parse_capability("add-task").unwrap(), Capability::AddTask);
        assert!(matches!(
            parse_capability("teleport"),
            Err(DomainError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_denied_output() {
        console::set_colors_enabled(false);

        let enforcement = BehaviorEnforcement::for_level(StrictnessLevel::Lockdown);
        let out = CheckOutput {
            check: BehaviorCheck::evaluate(&enforcement, Capability::AddTask),
        };

        assert!(out.to_human().contains("Lockdown Mode"));
        let json = out.to_json();
        assert_eq!(json["allowed"], false);
        assert_eq!(json["capability"], "add_task");
        assert_eq!(json["level"], 5);
    }
}
