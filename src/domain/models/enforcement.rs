//! Behavior enforcement derived from a strictness level.

use serde::{Deserialize, Serialize};

use super::strictness::StrictnessLevel;

/// Feature gates implied by a level.
///
/// Every gate is monotonic: a higher level never grants more than a lower one.
/// `None` limits mean unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorEnforcement {
    pub level: StrictnessLevel,
    pub can_add_task: bool,
    pub can_open_exploration: bool,
    pub can_start_side_project: bool,
    pub can_reschedule_deadline: bool,
    pub offshoot_ideas_per_day: Option<u32>,
    pub max_active_tasks: Option<u32>,
    pub requires_focus_session: bool,
    pub show_warnings: bool,
    pub override_available: bool,
}

impl BehaviorEnforcement {
    pub const fn for_level(level: StrictnessLevel) -> Self {
        use StrictnessLevel::{Flow, Guided, Lockdown, Serious, Strict};

        Self {
            level,
            can_add_task: matches!(level, Flow | Guided | Serious),
            can_open_exploration: matches!(level, Flow | Guided),
            can_start_side_project: matches!(level, Flow | Guided),
            can_reschedule_deadline: matches!(level, Flow | Guided | Serious),
            offshoot_ideas_per_day: match level {
                Flow | Guided | Serious => None,
                Strict => Some(3),
                Lockdown => Some(1),
            },
            max_active_tasks: match level {
                Flow | Guided => None,
                Serious => Some(5),
                Strict => Some(3),
                Lockdown => Some(1),
            },
            requires_focus_session: matches!(level, Serious | Strict | Lockdown),
            show_warnings: !matches!(level, Flow),
            override_available: !level.is_floor(),
        }
    }

    /// Whether the boolean gate for `capability` is open.
    pub const fn permits(&self, capability: Capability) -> bool {
        match capability {
            Capability::AddTask => self.can_add_task,
            Capability::OpenExploration => self.can_open_exploration,
            Capability::StartSideProject => self.can_start_side_project,
            Capability::RescheduleDeadline => self.can_reschedule_deadline,
            Capability::SkipFocusSession => !self.requires_focus_session,
        }
    }
}

/// A gated action a consumer may ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    AddTask,
    OpenExploration,
    StartSideProject,
    RescheduleDeadline,
    SkipFocusSession,
}

impl Capability {
    pub const ALL: [Self; 5] = [
        Self::AddTask,
        Self::OpenExploration,
        Self::StartSideProject,
        Self::RescheduleDeadline,
        Self::SkipFocusSession,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddTask => "add_task",
            Self::OpenExploration => "open_exploration",
            Self::StartSideProject => "start_side_project",
            Self::RescheduleDeadline => "reschedule_deadline",
            Self::SkipFocusSession => "skip_focus_session",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "add_task" => Some(Self::AddTask),
            "open_exploration" => Some(Self::OpenExploration),
            "start_side_project" => Some(Self::StartSideProject),
            "reschedule_deadline" => Some(Self::RescheduleDeadline),
            "skip_focus_session" => Some(Self::SkipFocusSession),
            _ => None,
        }
    }

    /// Denial copy shown when the gate is closed at `level`.
    pub fn denial_message(self, level: StrictnessLevel) -> String {
        match (self, level) {
            (Self::AddTask, StrictnessLevel::Lockdown) => {
                "Lockdown Mode: no new tasks. Finish or drop something you already committed to."
                    .to_string()
            }
            (Self::AddTask, _) => format!(
                "{}: adding tasks is paused. Complete existing work to rebuild trust.",
                level.name()
            ),
            (Self::OpenExploration, StrictnessLevel::Serious) => {
                "Serious Mode: exploration is closed while you deliver on current commitments."
                    .to_string()
            }
            (Self::OpenExploration, _) => format!(
                "{}: exploration is locked. Park the idea and come back when trust recovers.",
                level.name()
            ),
            _ => format!(
                "This action is restricted in {}. {}",
                level.name(),
                level.config().restriction_message
            ),
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to "may I do this now?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorCheck {
    pub capability: Capability,
    pub allowed: bool,
    pub level: StrictnessLevel,
    /// Present only when denied
    pub message: Option<String>,
}

impl BehaviorCheck {
    pub fn evaluate(enforcement: &BehaviorEnforcement, capability: Capability) -> Self {
        let allowed = enforcement.permits(capability);
        Self {
            capability,
            allowed,
            level: enforcement.level,
            message: (!allowed).then(|| capability.denial_message(enforcement.level)),
        }
    }
}

/// Expected, user-facing policy outcome. Denials are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub allowed: bool,
    pub message: String,
}

impl PolicyDecision {
    pub fn allow(message: impl Into<String>) -> Self {
        Self {
            allowed: true,
            message: message.into(),
        }
    }

    pub fn deny(message: impl Into<String>) -> Self {
        Self {
            allowed: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit_rank(limit: Option<u32>) -> u32 {
        limit.unwrap_or(u32::MAX)
    }

    #[test]
    fn test_add_task_gate() {
        assert!(BehaviorEnforcement::for_level(StrictnessLevel::Flow).can_add_task);
        assert!(BehaviorEnforcement::for_level(StrictnessLevel::Serious).can_add_task);
        assert!(!BehaviorEnforcement::for_level(StrictnessLevel::Strict).can_add_task);
        assert!(!BehaviorEnforcement::for_level(StrictnessLevel::Lockdown).can_add_task);
    }

    #[test]
    fn test_offshoot_limits() {
        assert_eq!(BehaviorEnforcement::for_level(StrictnessLevel::Serious).offshoot_ideas_per_day, None);
        assert_eq!(BehaviorEnforcement::for_level(StrictnessLevel::Strict).offshoot_ideas_per_day, Some(3));
        assert_eq!(BehaviorEnforcement::for_level(StrictnessLevel::Lockdown).offshoot_ideas_per_day, Some(1));
    }

    #[test]
    fn test_gates_are_monotonic() {
        for pair in StrictnessLevel::ALL.windows(2) {
            let looser = BehaviorEnforcement::for_level(pair[0]);
            let tighter = BehaviorEnforcement::for_level(pair[1]);

            for capability in Capability::ALL {
                assert!(
                    looser.permits(capability) || !tighter.permits(capability),
                    "{capability} opens up between {} and {}",
                    pair[0],
                    pair[1]
                );
            }
            assert!(limit_rank(tighter.offshoot_ideas_per_day) <= limit_rank(looser.offshoot_ideas_per_day));
            assert!(limit_rank(tighter.max_active_tasks) <= limit_rank(looser.max_active_tasks));
            assert!(looser.override_available || !tighter.override_available);
            assert!(tighter.show_warnings || !looser.show_warnings);
        }
    }

    #[test]
    fn test_override_unavailable_only_at_floor() {
        for level in StrictnessLevel::ALL {
            assert_eq!(
                BehaviorEnforcement::for_level(level).override_available,
                level != StrictnessLevel::Lockdown
            );
        }
    }

    #[test]
    fn test_bespoke_and_generic_denials() {
        let strict = BehaviorEnforcement::for_level(StrictnessLevel::Strict);

        let add_task = BehaviorCheck::evaluate(&strict, Capability::AddTask);
        assert!(!add_task.allowed);
        assert!(add_task.message.as_deref().unwrap().contains("adding tasks is paused"));

        let explore = BehaviorCheck::evaluate(&strict, Capability::OpenExploration);
        assert!(explore.message.as_deref().unwrap().contains("exploration is locked"));

        let reschedule = BehaviorCheck::evaluate(&strict, Capability::RescheduleDeadline);
        assert!(reschedule
            .message
            .as_deref()
            .unwrap()
            .starts_with("This action is restricted in Strict Mode."));

        let allowed = BehaviorCheck::evaluate(
            &BehaviorEnforcement::for_level(StrictnessLevel::Flow),
            Capability::AddTask,
        );
        assert!(allowed.allowed);
        assert!(allowed.message.is_none());
    }

    #[test]
    fn test_capability_parsing() {
        assert_eq!(Capability::from_str("add-task"), Some(Capability::AddTask));
        assert_eq!(Capability::from_str("OPEN_EXPLORATION"), Some(Capability::OpenExploration));
        assert_eq!(Capability::from_str("fly"), None);
    }
}
