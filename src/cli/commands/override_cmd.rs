//! `keel override`: spend the once-a-day override.

use anyhow::Result;

use crate::cli::context::CommandContext;
use crate::cli::display::{action_failure, action_success, output, CommandOutput};
use crate::domain::models::PolicyDecision;

#[derive(Debug, serde::Serialize)]
pub struct OverrideOutput {
    #[serde(flatten)]
    pub decision: PolicyDecision,
}

impl CommandOutput for OverrideOutput {
    fn to_human(&self) -> String {
        if self.decision.allowed {
            action_success(&self.decision.message)
        } else {
            action_failure(&self.decision.message)
        }
    }
}

pub async fn execute(ctx: &CommandContext) -> Result<()> {
    let service = ctx.regulation_service().await?;
    let decision = service.use_override(ctx.project_id).await?;

    output(&OverrideOutput { decision }, ctx.json);
    Ok(())
}
