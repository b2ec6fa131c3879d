//! Level and impact color mapping for CLI output.
//!
//! `console` drops styling when the output is not a terminal or `NO_COLOR`
//! is set.

use console::{style, StyledObject};

use crate::domain::models::StrictnessLevel;

/// Returns a styled level label, e.g. "3 (Serious Mode)".
///
/// Green for Flow, cyan for Guided, yellow for Serious, red for Strict and
/// bold red for Lockdown.
pub fn colorize_level(level: StrictnessLevel) -> StyledObject<String> {
    let text = level.to_string();
    match level {
        StrictnessLevel::Flow => style(text).green().bold(),
        StrictnessLevel::Guided => style(text).cyan(),
        StrictnessLevel::Serious => style(text).yellow(),
        StrictnessLevel::Strict => style(text).red(),
        StrictnessLevel::Lockdown => style(text).red().bold(),
    }
}

/// Returns a signed, styled trust impact ("+3", "-5", "0").
pub fn colorize_impact(impact: i32) -> StyledObject<String> {
    match impact {
        i if i > 0 => style(format!("+{i}")).green(),
        i if i < 0 => style(i.to_string()).red(),
        _ => style("0".to_string()).dim(),
    }
}

/// Styled trust score, colored by the band it falls in.
pub fn colorize_score(score: u8) -> StyledObject<String> {
    let level = StrictnessLevel::from_trust_score(score);
    let text = score.to_string();
    match level {
        StrictnessLevel::Flow | StrictnessLevel::Guided => style(text).green().bold(),
        StrictnessLevel::Serious => style(text).yellow().bold(),
        StrictnessLevel::Strict | StrictnessLevel::Lockdown => style(text).red().bold(),
    }
}

/// Styled yes/no for boolean gates.
pub fn yes_no(value: bool) -> StyledObject<&'static str> {
    if value {
        style("yes").green()
    } else {
        style("no").red()
    }
}

/// Styled label for detail views (bold + dimmed colon).
pub fn label(name: &str) -> String {
    format!("{}{}", style(name).bold(), style(":").dim())
}
