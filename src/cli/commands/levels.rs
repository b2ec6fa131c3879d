//! `keel levels`: the strictness level table.

use anyhow::Result;

use crate::cli::context::CommandContext;
use crate::cli::display::{colorize_level, list_table, output, CommandOutput};
use crate::domain::models::{StrictnessLevelConfig, LEVEL_CONFIGS};

#[derive(Debug, serde::Serialize)]
pub struct LevelsOutput {
    pub levels: Vec<StrictnessLevelConfig>,
}

impl CommandOutput for LevelsOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["level", "score", "behavior"]);
        for config in &self.levels {
            table.add_row(vec![
                colorize_level(config.level).to_string(),
                format!("{}-{}", config.min_score, config.max_score),
                config.behavior.to_string(),
            ]);
        }
        table.to_string()
    }
}

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let out = LevelsOutput {
        levels: LEVEL_CONFIGS.to_vec(),
    };
    output(&out, ctx.json);
    Ok(())
}
