//! Strictness levels and their fixed policy descriptors.
//!
//! Levels are ordered from the most permissive (1) to the most restrictive
//! (5). A level is never set directly: it is resolved from the trust score
//! through five contiguous bands covering 0..=100.

use serde::{Deserialize, Serialize};

/// Highest trust score a state can hold.
pub const MAX_TRUST_SCORE: u8 = 100;

/// One of the five ordered policy tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum StrictnessLevel {
    /// Level 1, score 80-100
    #[default]
    Flow = 1,
    /// Level 2, score 60-79
    Guided = 2,
    /// Level 3, score 40-59
    Serious = 3,
    /// Level 4, score 20-39
    Strict = 4,
    /// Level 5, score 0-19
    Lockdown = 5,
}

impl StrictnessLevel {
    /// All levels, least to most restrictive.
    pub const ALL: [Self; 5] = [
        Self::Flow,
        Self::Guided,
        Self::Serious,
        Self::Strict,
        Self::Lockdown,
    ];

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Flow),
            2 => Some(Self::Guided),
            3 => Some(Self::Serious),
            4 => Some(Self::Strict),
            5 => Some(Self::Lockdown),
            _ => None,
        }
    }

    /// Resolve the level for a trust score.
    ///
    /// Scores above 100 are treated as 100.
    pub const fn from_trust_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::Flow,
            60..=79 => Self::Guided,
            40..=59 => Self::Serious,
            20..=39 => Self::Strict,
            0..=19 => Self::Lockdown,
        }
    }

    /// Static descriptor for this level.
    pub fn config(self) -> &'static StrictnessLevelConfig {
        &LEVEL_CONFIGS[self as usize - 1]
    }

    pub fn name(self) -> &'static str {
        self.config().name
    }

    /// True for the maximum restriction level.
    pub const fn is_floor(self) -> bool {
        matches!(self, Self::Lockdown)
    }
}

impl From<StrictnessLevel> for u8 {
    fn from(level: StrictnessLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for StrictnessLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or_else(|| format!("Invalid strictness level: {value}"))
    }
}

impl std::fmt::Display for StrictnessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_u8(), self.name())
    }
}

/// Fixed policy descriptor for a strictness level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrictnessLevelConfig {
    pub level: StrictnessLevel,
    pub name: &'static str,
    /// Inclusive lower bound of the score band
    pub min_score: u8,
    /// Inclusive upper bound of the score band
    pub max_score: u8,
    /// What the level means for day-to-day behavior
    pub behavior: &'static str,
    /// Shown when a user enters this level
    pub entry_message: &'static str,
    /// Shown when an action is gated at this level
    pub restriction_message: &'static str,
}

impl StrictnessLevelConfig {
    pub const fn contains(&self, score: u8) -> bool {
        score >= self.min_score && score <= self.max_score
    }
}

/// The five level descriptors, indexed by `level - 1`.
pub const LEVEL_CONFIGS: [StrictnessLevelConfig; 5] = [
    StrictnessLevelConfig {
        level: StrictnessLevel::Flow,
        name: "Flow Mode",
        min_score: 80,
        max_score: MAX_TRUST_SCORE,
        behavior: "Full freedom. Add tasks, explore ideas and start side projects as you like.",
        entry_message: "You're in Flow Mode. Your track record has earned you full freedom.",
        restriction_message: "Nothing is restricted in Flow Mode.",
    },
    StrictnessLevelConfig {
        level: StrictnessLevel::Guided,
        name: "Guided Mode",
        min_score: 60,
        max_score: 79,
        behavior: "Gentle nudges. Everything stays open, but warnings appear when you drift.",
        entry_message: "Guided Mode: a few slips lately. Stay close to your plan.",
        restriction_message: "Guided Mode only warns. Keep an eye on your commitments.",
    },
    StrictnessLevelConfig {
        level: StrictnessLevel::Serious,
        name: "Serious Mode",
        min_score: 40,
        max_score: 59,
        behavior: "Focus first. Exploration and side projects are closed, active tasks are capped at 5.",
        entry_message: "Serious Mode: exploration is paused until you deliver on what you started.",
        restriction_message: "Serious Mode keeps you on your current work.",
    },
    StrictnessLevelConfig {
        level: StrictnessLevel::Strict,
        name: "Strict Mode",
        min_score: 20,
        max_score: 39,
        behavior: "No new tasks. Offshoot ideas are capped at 3 per day and deadlines are fixed.",
        entry_message: "Strict Mode: no new commitments until existing ones move forward.",
        restriction_message: "Strict Mode blocks new commitments.",
    },
    StrictnessLevelConfig {
        level: StrictnessLevel::Lockdown,
        name: "Lockdown Mode",
        min_score: 0,
        max_score: 19,
        behavior: "Finish what exists. One offshoot idea per day and no override.",
        entry_message: "Lockdown Mode: everything except finishing current work is closed.",
        restriction_message: "Lockdown Mode allows only work on existing tasks.",
    },
];
