//! `keel recompute`: re-aggregate the trailing event window.

use anyhow::Result;
use console::style;

use super::state::StateOutput;
use crate::cli::context::CommandContext;
use crate::cli::display::{colorize_level, output, CommandOutput};
use crate::domain::models::{EventType, StrictnessLevel};
use crate::services::RecomputeOutcome;

#[derive(Debug, serde::Serialize)]
pub struct LevelChangeOutput {
    pub from: StrictnessLevel,
    pub to: StrictnessLevel,
    pub escalated: bool,
    pub message: String,
}

#[derive(Debug, serde::Serialize)]
pub struct RecomputeOutput {
    pub state: StateOutput,
    pub previous_score: u8,
    pub rescored: bool,
    pub level_change: Option<LevelChangeOutput>,
}

impl From<&RecomputeOutcome> for RecomputeOutput {
    fn from(outcome: &RecomputeOutcome) -> Self {
        let level_change = outcome.level_change.as_ref().map(|event| LevelChangeOutput {
            from: outcome.previous_level,
            to: outcome.state.current_level,
            escalated: event.event_type == EventType::LevelEscalated,
            message: outcome.state.current_level.config().entry_message.to_string(),
        });

        Self {
            state: StateOutput::from(&outcome.state),
            previous_score: outcome.previous_score,
            rescored: outcome.rescored,
            level_change,
        }
    }
}

impl RecomputeOutput {
    /// One-line score movement, e.g. "Trust score 75 -> 54".
    pub fn score_line(&self) -> String {
        if self.state.trust_score == self.previous_score {
            format!("Trust score unchanged at {}", self.state.trust_score)
        } else {
            format!(
                "Trust score {} -> {}",
                self.previous_score, self.state.trust_score
            )
        }
    }

    /// Level change banner, when the level moved.
    pub fn level_lines(&self) -> Vec<String> {
        let Some(change) = &self.level_change else {
            return vec![];
        };
        let arrow = if change.escalated {
            style("\u{25b2} Level raised").red().bold()
        } else {
            style("\u{25bc} Level lowered").green().bold()
        };
        vec![
            format!(
                "{arrow}: {} -> {}",
                colorize_level(change.from),
                colorize_level(change.to)
            ),
            change.message.clone(),
        ]
    }
}

impl CommandOutput for RecomputeOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.score_line()];
        lines.extend(self.level_lines());
        lines.push(String::new());
        lines.push(self.state.to_human());
        lines.join("\n")
    }
}

pub async fn execute(ctx: &CommandContext) -> Result<()> {
    let service = ctx.regulation_service().await?;
    let outcome = service.recompute_state(ctx.project_id).await?;

    output(&RecomputeOutput::from(&outcome), ctx.json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{RegulationEvent, RegulationState, SubjectKey};
    use uuid::Uuid;

    fn outcome(previous: u8, score: u8) -> RecomputeOutcome {
        let key = SubjectKey::new(Uuid::new_v4(), None);
        let mut state = RegulationState::seed(&key, score);
        state.current_level = StrictnessLevel::from_trust_score(score);
        let previous_level = StrictnessLevel::from_trust_score(previous);
        RecomputeOutcome {
            level_change: RegulationEvent::level_change(&key, previous_level, state.current_level, score),
            state,
            previous_score: previous,
            previous_level,
            rescored: previous != score,
        }
    }

    #[test]
    fn test_escalation_banner() {
        console::set_colors_enabled(false);

        let out = RecomputeOutput::from(&outcome(82, 78));
        let change = out.level_change.as_ref().unwrap();
        assert!(change.escalated);
        assert_eq!(change.from, StrictnessLevel::Flow);
        assert_eq!(change.to, StrictnessLevel::Guided);

        let human = out.to_human();
        assert!(human.starts_with("Trust score 82 -> 78"));
        assert!(human.contains("Level raised: 1 (Flow Mode) -> 2 (Guided Mode)"));
    }

    #[test]
    fn test_unchanged_output() {
        let out = RecomputeOutput::from(&outcome(84, 84));
        assert!(out.level_change.is_none());
        assert_eq!(out.score_line(), "Trust score unchanged at 84");
        assert!(out.level_lines().is_empty());
        assert_eq!(out.to_json()["level_change"], serde_json::Value::Null);
    }
}
