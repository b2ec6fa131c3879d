//! `keel enforcement`: behavior gates for a level.

use anyhow::Result;
use clap::Args;

use crate::cli::context::CommandContext;
use crate::cli::display::{colorize_level, output, yes_no, CommandOutput, DetailView};
use crate::domain::errors::DomainError;
use crate::domain::models::{BehaviorEnforcement, StrictnessLevel};

#[derive(Args, Debug)]
pub struct EnforcementArgs {
    /// Level 1-5; defaults to the current level
    pub level: Option<u8>,
}

#[derive(Debug, serde::Serialize)]
pub struct EnforcementOutput {
    #[serde(flatten)]
    pub enforcement: BehaviorEnforcement,
}

fn limit(value: Option<u32>) -> String {
    value.map_or_else(|| "unlimited".to_string(), |n| n.to_string())
}

impl CommandOutput for EnforcementOutput {
    fn to_human(&self) -> String {
        let e = &self.enforcement;
        DetailView::new(&format!("Behavior at level {}", colorize_level(e.level)))
            .field("Add tasks", yes_no(e.can_add_task))
            .field("Open exploration", yes_no(e.can_open_exploration))
            .field("Start side projects", yes_no(e.can_start_side_project))
            .field("Reschedule deadlines", yes_no(e.can_reschedule_deadline))
            .field("Offshoot ideas/day", limit(e.offshoot_ideas_per_day))
            .field("Max active tasks", limit(e.max_active_tasks))
            .field("Focus session required", yes_no(e.requires_focus_session))
            .field("Warnings shown", yes_no(e.show_warnings))
            .field("Override available", yes_no(e.override_available))
            .item(e.level.config().restriction_message)
            .render()
    }
}

pub fn parse_level(raw: u8) -> Result<StrictnessLevel, DomainError> {
    StrictnessLevel::from_u8(raw).ok_or_else(|| {
        DomainError::ValidationFailed(format!("Invalid level {raw}. Must be between 1 and 5"))
    })
}

pub async fn execute(args: EnforcementArgs, ctx: &CommandContext) -> Result<()> {
    let service = ctx.regulation_service().await?;
    let level = match args.level {
        Some(raw) => parse_level(raw)?,
        None => service.get_state(ctx.project_id).await?.current_level,
    };

    let enforcement = service.get_behavior_enforcement(level);
    output(&EnforcementOutput { enforcement }, ctx.json);
    Ok(())
}
