//! Regulation state domain model.
//!
//! A `RegulationState` is the persisted standing of one user, optionally
//! scoped to a master project. It is created lazily on first access and
//! rewritten by every recompute of the trailing event window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::regulation_event::{EventType, RegulationEvent};
use super::strictness::{StrictnessLevel, MAX_TRUST_SCORE};

/// Identifies whose standing is tracked: a user, globally or per project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectKey {
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
}

impl SubjectKey {
    pub fn new(user_id: Uuid, project_id: Option<Uuid>) -> Self {
        Self { user_id, project_id }
    }
}

impl std::fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.project_id {
            Some(project) => write!(f, "{}/{}", self.user_id, project),
            None => write!(f, "{}", self.user_id),
        }
    }
}

/// Rolling counters over the trailing event window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowCounters {
    pub tasks_completed_7d: u32,
    pub focus_sessions_7d: u32,
    pub tasks_ignored_7d: u32,
    pub drift_events_7d: u32,
    pub missed_deadlines_7d: u32,
    pub abandoned_sessions_7d: u32,
    /// Offshoot and side-project overuse combined
    pub overuse_events_7d: u32,
}

impl WindowCounters {
    /// Count the window's events by type.
    pub fn from_events(events: &[RegulationEvent]) -> Self {
        events.iter().fold(Self::default(), |mut counters, event| {
            match event.event_type {
                EventType::TaskCompleted => counters.tasks_completed_7d += 1,
                EventType::FocusCompleted => counters.focus_sessions_7d += 1,
                EventType::TaskIgnored => counters.tasks_ignored_7d += 1,
                EventType::SessionDrift => counters.drift_events_7d += 1,
                EventType::DeadlineMissed => counters.missed_deadlines_7d += 1,
                EventType::SessionAbandoned => counters.abandoned_sessions_7d += 1,
                EventType::OffshootOveruse | EventType::SideProjectOveruse => {
                    counters.overuse_events_7d += 1;
                }
                EventType::MilestoneHit
                | EventType::ConsistencyWin
                | EventType::LevelEscalated
                | EventType::LevelDeescalated
                | EventType::OverrideUsed => {}
            }
            counters
        })
    }
}

/// Sum of the trust impacts in `events`.
pub fn net_impact(events: &[RegulationEvent]) -> i64 {
    events.iter().map(|e| i64::from(e.impact_on_trust)).sum()
}

/// Clamp an unbounded score into 0..=100.
pub fn clamp_trust_score(score: i64) -> u8 {
    // Bounded by the clamp, so the cast is lossless.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clamped = score.clamp(0, i64::from(MAX_TRUST_SCORE)) as u8;
    clamped
}

/// Outcome of applying a window to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recalculation {
    pub previous_score: u8,
    pub previous_level: StrictnessLevel,
    /// Whether the window sum was applied to the score
    pub rescored: bool,
}

/// A user's current standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationState {
    pub id: Uuid,
    pub user_id: Uuid,
    pub master_project_id: Option<Uuid>,
    pub trust_score: u8,
    pub current_level: StrictnessLevel,
    #[serde(flatten)]
    pub counters: WindowCounters,
    /// When the window was last applied; `None` until the first recompute
    pub last_calculated_at: Option<DateTime<Utc>>,
    /// Highest event sequence seen by the last recompute
    pub applied_through: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Version for optimistic locking
    pub version: u64,
}

impl RegulationState {
    /// Score given to a state on first access.
    pub const INITIAL_TRUST_SCORE: u8 = 75;

    /// Seed a fresh state for `key`.
    ///
    /// The seed is stored at level 1 regardless of the score; the first
    /// recompute resolves the level from the score.
    pub fn seed(key: &SubjectKey, initial_trust_score: u8) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: key.user_id,
            master_project_id: key.project_id,
            trust_score: initial_trust_score.min(MAX_TRUST_SCORE),
            current_level: StrictnessLevel::Flow,
            counters: WindowCounters::default(),
            last_calculated_at: None,
            applied_through: 0,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    pub fn key(&self) -> SubjectKey {
        SubjectKey::new(self.user_id, self.master_project_id)
    }

    /// Whether the window sum should be added to the stored score.
    ///
    /// True before the first recompute, and afterwards only when the window
    /// holds a scored event stored after `applied_through`. Events without a
    /// sequence have not been seen by any recompute. Informational events
    /// never trigger a rescore.
    pub fn needs_rescore(&self, window: &[RegulationEvent]) -> bool {
        if self.last_calculated_at.is_none() {
            return true;
        }
        window.iter().any(|e| {
            !e.event_type.is_informational()
                && e.sequence.is_none_or(|seq| seq > self.applied_through)
        })
    }

    /// Apply the trailing window to this state.
    ///
    /// The whole window's impact is added to the previously stored score,
    /// so an event keeps counting on each rescore for as long as it stays in
    /// the window.
    pub fn apply_window(&mut self, window: &[RegulationEvent], now: DateTime<Utc>) -> Recalculation {
        let recalculation = Recalculation {
            previous_score: self.trust_score,
            previous_level: self.current_level,
            rescored: self.needs_rescore(window),
        };

        self.counters = WindowCounters::from_events(window);
        if recalculation.rescored {
            self.trust_score = clamp_trust_score(i64::from(self.trust_score) + net_impact(window));
        }
        self.current_level = StrictnessLevel::from_trust_score(self.trust_score);
        self.applied_through = window
            .iter()
            .filter_map(|e| e.sequence)
            .fold(self.applied_through, i64::max);
        self.last_calculated_at = Some(now);
        self.updated_at = now;

        recalculation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn key() -> SubjectKey {
        SubjectKey::new(Uuid::new_v4(), None)
    }

    /// Stored events with sequences starting at `first`.
    fn stored(key: &SubjectKey, first: i64, types: &[EventType]) -> Vec<RegulationEvent> {
        (first..)
            .zip(types)
            .map(|(seq, t)| RegulationEvent::new(key, *t).with_sequence(seq))
            .collect()
    }

    fn events(key: &SubjectKey, types: &[EventType]) -> Vec<RegulationEvent> {
        stored(key, 1, types)
    }

    #[test]
    fn test_seed_state() {
        let key = key();
        let state = RegulationState::seed(&key, RegulationState::INITIAL_TRUST_SCORE);
        assert_eq!(state.trust_score, 75);
        assert_eq!(state.current_level, StrictnessLevel::Flow);
        assert!(state.last_calculated_at.is_none());
        assert_eq!(state.key(), key);
    }

    #[test]
    fn test_counters() {
        let key = key();
        let window = events(
            &key,
            &[
                EventType::DeadlineMissed,
                EventType::DeadlineMissed,
                EventType::SessionDrift,
                EventType::OffshootOveruse,
                EventType::SideProjectOveruse,
                EventType::TaskCompleted,
                EventType::LevelEscalated,
            ],
        );
        let counters = WindowCounters::from_events(&window);
        assert_eq!(counters.missed_deadlines_7d, 2);
        assert_eq!(counters.drift_events_7d, 1);
        assert_eq!(counters.overuse_events_7d, 2);
        assert_eq!(counters.tasks_completed_7d, 1);
        assert_eq!(counters.focus_sessions_7d, 0);
    }

    #[test]
    fn test_apply_window_scenario() {
        let key = key();
        let mut state = RegulationState::seed(&key, 75);
        let window = events(
            &key,
            &[
                EventType::DeadlineMissed,
                EventType::DeadlineMissed,
                EventType::DeadlineMissed,
                EventType::SessionDrift,
                EventType::SessionDrift,
            ],
        );

        let recalculation = state.apply_window(&window, Utc::now());
        assert!(recalculation.rescored);
        assert_eq!(recalculation.previous_level, StrictnessLevel::Flow);
        assert_eq!(state.trust_score, 54);
        assert_eq!(state.current_level, StrictnessLevel::Serious);
    }

    #[test]
    fn test_second_apply_without_new_events_is_stable() {
        let key = key();
        let mut state = RegulationState::seed(&key, 75);
        let window = events(&key, &[EventType::DeadlineMissed, EventType::SessionDrift]);

        state.apply_window(&window, Utc::now() + Duration::seconds(1));
        let after_first = (state.trust_score, state.current_level);

        let recalculation = state.apply_window(&window, Utc::now() + Duration::seconds(2));
        assert!(!recalculation.rescored);
        assert_eq!((state.trust_score, state.current_level), after_first);
    }

    #[test]
    fn test_new_scored_event_reapplies_whole_window() {
        let key = key();
        let mut state = RegulationState::seed(&key, 75);
        let mut window = events(&key, &[EventType::DeadlineMissed]);
        state.apply_window(&window, Utc::now());
        assert_eq!(state.trust_score, 70);
        assert_eq!(state.applied_through, 1);

        window.extend(stored(&key, 2, &[EventType::DeadlineMissed]));
        state.apply_window(&window, Utc::now());
        // 70 + (-5 - 5): the first miss counts a second time.
        assert_eq!(state.trust_score, 60);
        assert_eq!(state.applied_through, 2);
    }

    #[test]
    fn test_event_stamped_before_last_calculation_still_rescores() {
        let key = key();
        let mut state = RegulationState::seed(&key, 75);
        let calculated_at = Utc::now();
        let mut window = events(&key, &[EventType::TaskCompleted]);
        state.apply_window(&window, calculated_at);
        assert_eq!(state.trust_score, 77);

        // Created before the recompute above but stored after it.
        window.extend(
            stored(&key, 2, &[EventType::DeadlineMissed])
                .into_iter()
                .map(|e| e.at(calculated_at - Duration::seconds(1))),
        );
        let recalculation = state.apply_window(&window, calculated_at + Duration::seconds(1));
        assert!(recalculation.rescored);
        assert_eq!(state.trust_score, 74);
    }

    #[test]
    fn test_unsequenced_event_counts_as_new() {
        let key = key();
        let mut state = RegulationState::seed(&key, 75);
        let mut window = events(&key, &[EventType::TaskCompleted]);
        state.apply_window(&window, Utc::now());

        window.push(RegulationEvent::new(&key, EventType::SessionDrift));
        assert!(state.needs_rescore(&window));
    }

    #[test]
    fn test_informational_event_does_not_rescore() {
        let key = key();
        let mut state = RegulationState::seed(&key, 75);
        let mut window = events(&key, &[EventType::TaskIgnored]);
        state.apply_window(&window, Utc::now());
        assert_eq!(state.trust_score, 73);

        window.extend(stored(&key, 2, &[EventType::OverrideUsed]));
        let recalculation = state.apply_window(&window, Utc::now());
        assert!(!recalculation.rescored);
        assert_eq!(state.trust_score, 73);
        assert_eq!(state.applied_through, 2);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp_trust_score(-250), 0);
        assert_eq!(clamp_trust_score(0), 0);
        assert_eq!(clamp_trust_score(54), 54);
        assert_eq!(clamp_trust_score(100), 100);
        assert_eq!(clamp_trust_score(180), 100);
    }

    #[test]
    fn test_fifty_missed_deadlines_saturate_at_zero() {
        let key = key();
        let mut state = RegulationState::seed(&key, 75);
        let window = events(&key, &[EventType::DeadlineMissed; 50]);
        state.apply_window(&window, Utc::now());
        assert_eq!(state.trust_score, 0);
        assert_eq!(state.current_level, StrictnessLevel::Lockdown);
    }

    fn event_type_strategy() -> impl Strategy<Value = EventType> {
        prop::sample::select(EventType::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_score_stays_in_range(
            start in 0u8..=100,
            types in prop::collection::vec(event_type_strategy(), 0..200),
        ) {
            let key = key();
            let mut state = RegulationState::seed(&key, start);
            let window = events(&key, &types);
            state.apply_window(&window, Utc::now());
            prop_assert!(state.trust_score <= 100);
            prop_assert_eq!(state.current_level, StrictnessLevel::from_trust_score(state.trust_score));
        }
    }
}
