//! `keel events`: recent regulation events.

use anyhow::Result;
use clap::Args;

use crate::cli::context::CommandContext;
use crate::cli::display::{
    colorize_impact, list_table, output, render_list, short_id, short_time, truncate, CommandOutput,
};
use crate::domain::models::RegulationEvent;

#[derive(Args, Debug)]
pub struct EventsArgs {
    /// Maximum number of events to show (defaults to regulation.recent_events_limit)
    #[arg(short, long)]
    pub limit: Option<u32>,
}

#[derive(Debug, serde::Serialize)]
pub struct EventListOutput {
    pub events: Vec<RegulationEvent>,
    pub total: usize,
}

impl CommandOutput for EventListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "time", "type", "impact", "severity", "metadata"]);
        for event in &self.events {
            let metadata = match event.metadata.as_object() {
                Some(map) if map.is_empty() => String::new(),
                _ => truncate(&event.metadata.to_string(), 40),
            };
            table.add_row(vec![
                short_id(&event.id.to_string()).to_string(),
                short_time(&event.created_at),
                event.event_type.to_string(),
                colorize_impact(event.impact_on_trust).to_string(),
                event.severity.to_string(),
                metadata,
            ]);
        }
        render_list("event", &table, self.total)
    }
}

pub async fn execute(args: EventsArgs, ctx: &CommandContext) -> Result<()> {
    let service = ctx.regulation_service().await?;
    let events = service.get_recent_events(ctx.project_id, args.limit).await?;

    let total = events.len();
    output(&EventListOutput { events, total }, ctx.json);
    Ok(())
}
