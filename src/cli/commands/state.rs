//! `keel state`: current trust score and level.

use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::cli::context::CommandContext;
use crate::cli::display::{colorize_level, colorize_score, output, short_time_opt, CommandOutput, DetailView};
use crate::domain::models::{RegulationState, StrictnessLevel, WindowCounters};

#[derive(Debug, serde::Serialize)]
pub struct StateOutput {
    pub user_id: Uuid,
    pub master_project_id: Option<Uuid>,
    pub trust_score: u8,
    pub level: StrictnessLevel,
    pub level_name: String,
    pub behavior: String,
    pub counters: WindowCounters,
    pub last_calculated_at: Option<DateTime<Utc>>,
}

impl From<&RegulationState> for StateOutput {
    fn from(state: &RegulationState) -> Self {
        let config = state.current_level.config();
        Self {
            user_id: state.user_id,
            master_project_id: state.master_project_id,
            trust_score: state.trust_score,
            level: state.current_level,
            level_name: config.name.to_string(),
            behavior: config.behavior.to_string(),
            counters: state.counters,
            last_calculated_at: state.last_calculated_at,
        }
    }
}

impl StateOutput {
    /// Detail view shared by the state, log and recompute commands.
    pub fn detail(&self) -> DetailView {
        let c = &self.counters;
        DetailView::new("Regulation state")
            .field("Trust score", colorize_score(self.trust_score))
            .field("Level", colorize_level(self.level))
            .field("Behavior", &self.behavior)
            .field_opt("Project", self.master_project_id)
            .field("Calculated", short_time_opt(self.last_calculated_at.as_ref()))
            .section("Last 7 days")
            .field("Tasks completed", c.tasks_completed_7d)
            .field("Focus sessions", c.focus_sessions_7d)
            .field("Tasks ignored", c.tasks_ignored_7d)
            .field("Drift events", c.drift_events_7d)
            .field("Missed deadlines", c.missed_deadlines_7d)
            .field("Abandoned sessions", c.abandoned_sessions_7d)
            .field("Overuse events", c.overuse_events_7d)
    }
}

impl CommandOutput for StateOutput {
    fn to_human(&self) -> String {
        self.detail().render()
    }
}

pub async fn execute(ctx: &CommandContext) -> Result<()> {
    let service = ctx.regulation_service().await?;
    let state = service.get_state(ctx.project_id).await?;

    output(&StateOutput::from(&state), ctx.json);
    Ok(())
}
