//! Regulation event domain model.
//!
//! Events are the only input to the trust score. Every event carries a fixed
//! trust impact decided by its type; callers never choose the delta.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::regulation_state::SubjectKey;
use super::strictness::StrictnessLevel;

/// Kind of behavioral occurrence recorded in the event log.
///
/// The wire names (`as_str`) are the contract other collaborators emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    TaskCompleted,
    FocusCompleted,
    MilestoneHit,
    ConsistencyWin,
    TaskIgnored,
    SessionDrift,
    DeadlineMissed,
    SessionAbandoned,
    OffshootOveruse,
    SideProjectOveruse,
    LevelEscalated,
    LevelDeescalated,
    OverrideUsed,
}

impl EventType {
    /// Every event type, in wire-contract order.
    pub const ALL: [Self; 13] = [
        Self::TaskCompleted,
        Self::FocusCompleted,
        Self::MilestoneHit,
        Self::ConsistencyWin,
        Self::TaskIgnored,
        Self::SessionDrift,
        Self::DeadlineMissed,
        Self::SessionAbandoned,
        Self::OffshootOveruse,
        Self::SideProjectOveruse,
        Self::LevelEscalated,
        Self::LevelDeescalated,
        Self::OverrideUsed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskCompleted => "task_completed",
            Self::FocusCompleted => "focus_completed",
            Self::MilestoneHit => "milestone_hit",
            Self::ConsistencyWin => "consistency_win",
            Self::TaskIgnored => "task_ignored",
            Self::SessionDrift => "session_drift",
            Self::DeadlineMissed => "deadline_missed",
            Self::SessionAbandoned => "session_abandoned",
            Self::OffshootOveruse => "offshoot_overuse",
            Self::SideProjectOveruse => "side_project_overuse",
            Self::LevelEscalated => "level_escalated",
            Self::LevelDeescalated => "level_deescalated",
            Self::OverrideUsed => "override_used",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "task_completed" => Some(Self::TaskCompleted),
            "focus_completed" => Some(Self::FocusCompleted),
            "milestone_hit" => Some(Self::MilestoneHit),
            "consistency_win" => Some(Self::ConsistencyWin),
            "task_ignored" => Some(Self::TaskIgnored),
            "session_drift" => Some(Self::SessionDrift),
            "deadline_missed" => Some(Self::DeadlineMissed),
            "session_abandoned" => Some(Self::SessionAbandoned),
            "offshoot_overuse" => Some(Self::OffshootOveruse),
            "side_project_overuse" => Some(Self::SideProjectOveruse),
            "level_escalated" => Some(Self::LevelEscalated),
            "level_deescalated" => Some(Self::LevelDeescalated),
            "override_used" => Some(Self::OverrideUsed),
            _ => None,
        }
    }

    /// Fixed trust-score delta for this event type.
    pub const fn trust_impact(&self) -> i32 {
        match self {
            Self::TaskCompleted => 2,
            Self::FocusCompleted => 3,
            Self::MilestoneHit => 5,
            Self::ConsistencyWin => 4,
            Self::TaskIgnored => -2,
            Self::SessionDrift => -3,
            Self::DeadlineMissed => -5,
            Self::SessionAbandoned => -4,
            Self::OffshootOveruse | Self::SideProjectOveruse => -3,
            Self::LevelEscalated | Self::LevelDeescalated | Self::OverrideUsed => 0,
        }
    }

    /// Informational events are logged for history but never move the score.
    pub const fn is_informational(&self) -> bool {
        matches!(
            self,
            Self::LevelEscalated | Self::LevelDeescalated | Self::OverrideUsed
        )
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable entry in the regulation event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub master_project_id: Option<Uuid>,
    pub event_type: EventType,
    pub severity: u8,
    pub impact_on_trust: i32,
    /// Free-form context supplied by the caller.
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    /// Position in the event log, assigned by the store on append
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
}

impl RegulationEvent {
    /// Default severity for caller-logged events.
    pub const DEFAULT_SEVERITY: u8 = 1;

    /// Create an event for `key`; the impact is taken from the type.
    pub fn new(key: &SubjectKey, event_type: EventType) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: key.user_id,
            master_project_id: key.project_id,
            event_type,
            severity: Self::DEFAULT_SEVERITY,
            impact_on_trust: event_type.trust_impact(),
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
            sequence: None,
        }
    }

    pub fn with_severity(mut self, severity: u8) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Mark the event as stored at `sequence` in the log.
    pub fn with_sequence(mut self, sequence: i64) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Backdate the event. Used when importing history and in tests.
    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Build the informational event recorded when a recompute moves the level.
    ///
    /// Returns `None` when the level did not change.
    pub fn level_change(
        key: &SubjectKey,
        old_level: StrictnessLevel,
        new_level: StrictnessLevel,
        trust_score: u8,
    ) -> Option<Self> {
        let event_type = match new_level.cmp(&old_level) {
            std::cmp::Ordering::Greater => EventType::LevelEscalated,
            std::cmp::Ordering::Less => EventType::LevelDeescalated,
            std::cmp::Ordering::Equal => return None,
        };

        let severity = old_level.as_u8().abs_diff(new_level.as_u8());
        Some(
            Self::new(key, event_type)
                .with_severity(severity)
                .with_metadata(serde_json::json!({
                    "old_level": old_level.as_u8(),
                    "new_level": new_level.as_u8(),
                    "trust_score": trust_score,
                })),
        )
    }

    /// Whether this event belongs to `key`.
    pub fn belongs_to(&self, key: &SubjectKey) -> bool {
        self.user_id == key.user_id && self.master_project_id == key.project_id
    }
}
