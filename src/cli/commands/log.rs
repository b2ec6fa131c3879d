//! `keel log`: record a behavioral event.

use anyhow::{Context, Result};
use clap::Args;
use uuid::Uuid;

use super::recompute::RecomputeOutput;
use crate::cli::context::CommandContext;
use crate::cli::display::{colorize_impact, output, CommandOutput};
use crate::domain::errors::DomainError;
use crate::domain::models::EventType;
use crate::services::LoggedEvent;

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Event type, e.g. task_completed, deadline_missed, session_drift
    pub event_type: String,

    /// Event severity (defaults to 1)
    #[arg(short, long)]
    pub severity: Option<u8>,

    /// Free-form JSON object stored with the event
    #[arg(short, long)]
    pub metadata: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct LogOutput {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub impact_on_trust: i32,
    pub severity: u8,
    pub result: RecomputeOutput,
}

impl From<&LoggedEvent> for LogOutput {
    fn from(logged: &LoggedEvent) -> Self {
        Self {
            event_id: logged.event.id,
            event_type: logged.event.event_type,
            impact_on_trust: logged.event.impact_on_trust,
            severity: logged.event.severity,
            result: RecomputeOutput::from(&logged.outcome),
        }
    }
}

impl CommandOutput for LogOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!(
                "Logged {} ({})",
                self.event_type,
                colorize_impact(self.impact_on_trust)
            ),
            self.result.score_line(),
        ];
        lines.extend(self.result.level_lines());
        lines.join("\n")
    }
}

/// Parse a loggable event type name.
///
/// Unknown names are rejected with the valid list. Informational types are
/// written by keel itself and rejected too.
pub fn parse_event_type(raw: &str) -> Result<EventType, DomainError> {
    match EventType::from_str(raw) {
        Some(event_type) if event_type.is_informational() => Err(DomainError::ValidationFailed(
            format!("'{raw}' is recorded by keel itself and cannot be logged"),
        )),
        Some(event_type) => Ok(event_type),
        None => {
            let valid: Vec<_> = EventType::ALL
                .iter()
                .filter(|t| !t.is_informational())
                .map(EventType::as_str)
                .collect();
            Err(DomainError::ValidationFailed(format!(
                "Unknown event type '{raw}'. Valid types: {}",
                valid.join(", ")
            )))
        }
    }
}

/// Parse `--metadata`, which must be a JSON object.
pub fn parse_metadata(raw: &str) -> Result<serde_json::Value> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("Metadata must be valid JSON")?;
    if !value.is_object() {
        return Err(DomainError::ValidationFailed("Metadata must be a JSON object".to_string()).into());
    }
    Ok(value)
}

pub async fn execute(args: LogArgs, ctx: &CommandContext) -> Result<()> {
    let event_type = parse_event_type(&args.event_type)?;
    let metadata = args.metadata.as_deref().map(parse_metadata).transpose()?;

    let service = ctx.regulation_service().await?;
    let logged = service
        .log_event(event_type, ctx.project_id, args.severity, metadata)
        .await?;

    output(&LogOutput::from(&logged), ctx.json);
    Ok(())
}
