//! Regulation service: event logging, window aggregation, level changes,
//! behavior checks and the daily override.
//!
//! Every public operation acts on behalf of the user reported by the
//! `SessionProvider` and fails with `DomainError::NotAuthenticated` when
//! there is none. Policy denials come back as values.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    BehaviorCheck, BehaviorEnforcement, Capability, EventType, PolicyDecision, RegulationConfig,
    RegulationEvent, RegulationState, StrictnessLevel, StrictnessLevelConfig, SubjectKey,
    LEVEL_CONFIGS,
};
use crate::domain::ports::{EventStore, SessionProvider, StateStore};

/// Result of one recompute of a subject's state.
#[derive(Debug, Clone, Serialize)]
pub struct RecomputeOutcome {
    pub state: RegulationState,
    pub previous_score: u8,
    pub previous_level: StrictnessLevel,
    /// Whether the window sum was applied to the score
    pub rescored: bool,
    /// The level change event, when the level moved
    pub level_change: Option<RegulationEvent>,
}

impl RecomputeOutcome {
    pub fn level_changed(&self) -> bool {
        self.level_change.is_some()
    }
}

/// A logged event together with the recompute it triggered.
#[derive(Debug, Clone, Serialize)]
pub struct LoggedEvent {
    pub event: RegulationEvent,
    pub outcome: RecomputeOutcome,
}

pub struct RegulationService<E: EventStore, S: StateStore> {
    events: Arc<E>,
    states: Arc<S>,
    session: Arc<dyn SessionProvider>,
    settings: RegulationConfig,
}

impl<E: EventStore, S: StateStore> RegulationService<E, S> {
    pub fn new(
        events: Arc<E>,
        states: Arc<S>,
        session: Arc<dyn SessionProvider>,
        settings: RegulationConfig,
    ) -> Self {
        Self {
            events,
            states,
            session,
            settings,
        }
    }

    fn subject(&self, project_id: Option<Uuid>) -> DomainResult<SubjectKey> {
        let user_id = self.session.current_user().ok_or(DomainError::NotAuthenticated)?;
        Ok(SubjectKey::new(user_id, project_id))
    }

    fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.settings.window_days))
    }

    /// Current state for the session user, seeding it on first access.
    pub async fn get_state(&self, project_id: Option<Uuid>) -> DomainResult<RegulationState> {
        let key = self.subject(project_id)?;
        self.load_or_seed(&key).await
    }

    async fn load_or_seed(&self, key: &SubjectKey) -> DomainResult<RegulationState> {
        if let Some(state) = self.states.find_latest(key).await? {
            return Ok(state);
        }

        let state = RegulationState::seed(key, self.settings.initial_trust_score);
        self.states.create(&state).await?;
        info!(subject = %key, trust_score = state.trust_score, "Seeded regulation state");
        Ok(state)
    }

    /// Record a behavioral event and recompute the owner's state.
    ///
    /// The trust impact always comes from `event_type`. Informational types
    /// are rejected: overrides go through `use_override` and level changes
    /// are written by the recompute.
    #[instrument(skip(self, metadata))]
    pub async fn log_event(
        &self,
        event_type: EventType,
        project_id: Option<Uuid>,
        severity: Option<u8>,
        metadata: Option<serde_json::Value>,
    ) -> DomainResult<LoggedEvent> {
        let key = self.subject(project_id)?;
        if event_type.is_informational() {
            return Err(DomainError::ValidationFailed(format!(
                "{event_type} is recorded by the engine and cannot be logged directly"
            )));
        }
        self.record(&key, event_type, severity, metadata).await
    }

    async fn record(
        &self,
        key: &SubjectKey,
        event_type: EventType,
        severity: Option<u8>,
        metadata: Option<serde_json::Value>,
    ) -> DomainResult<LoggedEvent> {
        let mut event = RegulationEvent::new(key, event_type);
        if let Some(severity) = severity {
            event = event.with_severity(severity);
        }
        if let Some(metadata) = metadata {
            event = event.with_metadata(metadata);
        }

        let sequence = self.events.append(&event).await?;
        let event = event.with_sequence(sequence);
        debug!(subject = %key, sequence, impact = event.impact_on_trust, "Logged regulation event");

        let outcome = self.recompute(key).await?;
        Ok(LoggedEvent { event, outcome })
    }

    /// Re-aggregate the trailing window into the session user's state.
    #[instrument(skip(self))]
    pub async fn recompute_state(&self, project_id: Option<Uuid>) -> DomainResult<RecomputeOutcome> {
        let key = self.subject(project_id)?;
        self.recompute(&key).await
    }

    /// Read-compute-write with optimistic retry on version conflicts.
    async fn recompute(&self, key: &SubjectKey) -> DomainResult<RecomputeOutcome> {
        let max_attempts = self.settings.max_recompute_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.try_recompute(key).await {
                Err(DomainError::ConcurrencyConflict { .. }) if attempt < max_attempts => {
                    warn!(subject = %key, attempt, max_attempts, "Regulation state changed underneath recompute, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn try_recompute(&self, key: &SubjectKey) -> DomainResult<RecomputeOutcome> {
        let mut state = self.load_or_seed(key).await?;
        let now = Utc::now();
        let window = self.events.list_since(key, self.window_start(now)).await?;

        let recalculation = state.apply_window(&window, now);
        self.states.update(&state).await?;
        state.version += 1;

        debug!(
            subject = %key,
            window_events = window.len(),
            rescored = recalculation.rescored,
            previous_score = recalculation.previous_score,
            trust_score = state.trust_score,
            "Recomputed regulation state"
        );

        let mut level_change = RegulationEvent::level_change(
            key,
            recalculation.previous_level,
            state.current_level,
            state.trust_score,
        );
        if let Some(event) = level_change.as_mut() {
            let sequence = self.events.append(event).await?;
            event.sequence = Some(sequence);
            info!(
                subject = %key,
                from = recalculation.previous_level.as_u8(),
                to = state.current_level.as_u8(),
                trust_score = state.trust_score,
                "Strictness level changed"
            );
        }

        Ok(RecomputeOutcome {
            state,
            previous_score: recalculation.previous_score,
            previous_level: recalculation.previous_level,
            rescored: recalculation.rescored,
            level_change,
        })
    }

    /// The five level bands with their display copy, lowest level first.
    pub fn level_configs(&self) -> &'static [StrictnessLevelConfig] {
        &LEVEL_CONFIGS
    }

    /// Feature gates for `level`.
    pub fn get_behavior_enforcement(&self, level: StrictnessLevel) -> BehaviorEnforcement {
        BehaviorEnforcement::for_level(level)
    }

    /// Whether the session user may perform `capability` right now.
    pub async fn check_behavior_allowed(
        &self,
        capability: Capability,
        project_id: Option<Uuid>,
    ) -> DomainResult<BehaviorCheck> {
        let state = self.get_state(project_id).await?;
        let enforcement = self.get_behavior_enforcement(state.current_level);
        let check = BehaviorCheck::evaluate(&enforcement, capability);

        if !check.allowed {
            debug!(capability = %capability, level = state.current_level.as_u8(), "Behavior denied");
        }
        Ok(check)
    }

    /// Spend the daily override.
    ///
    /// Denied at the floor level and when the user already used one today
    /// (UTC), across all projects.
    #[instrument(skip(self))]
    pub async fn use_override(&self, project_id: Option<Uuid>) -> DomainResult<PolicyDecision> {
        let key = self.subject(project_id)?;
        let state = self.load_or_seed(&key).await?;

        if state.current_level.is_floor() {
            info!(subject = %key, "Override refused at floor level");
            return Ok(PolicyDecision::deny(format!(
                "Override unavailable in {}. The only way out is to rebuild trust by finishing existing work.",
                state.current_level.name()
            )));
        }

        let today = start_of_day(Utc::now());
        let used_today = self
            .events
            .list_user_events_since(key.user_id, EventType::OverrideUsed, today)
            .await?;
        if !used_today.is_empty() {
            info!(subject = %key, "Override refused, already used today");
            return Ok(PolicyDecision::deny(
                "Override already used today. It resets at midnight UTC.",
            ));
        }

        self.record(
            &key,
            EventType::OverrideUsed,
            None,
            Some(serde_json::json!({ "level": state.current_level.as_u8() })),
        )
        .await?;
        info!(subject = %key, level = state.current_level.as_u8(), "Override granted");

        Ok(PolicyDecision::allow(
            "Override granted for today. Use it well and get back on track tomorrow.",
        ))
    }

    /// Most recent events for the session user, newest first.
    ///
    /// `None` uses the configured default limit.
    pub async fn get_recent_events(
        &self,
        project_id: Option<Uuid>,
        limit: Option<u32>,
    ) -> DomainResult<Vec<RegulationEvent>> {
        let key = self.subject(project_id)?;
        let limit = limit.unwrap_or(self.settings.recent_events_limit);
        self.events.recent(&key, limit).await
    }
}

/// Midnight UTC of the day containing `now`.
fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN))
}
