//! SQLite implementation of the StateStore port.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{format_datetime, narrow, parse_datetime, parse_optional_datetime, parse_optional_uuid, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{RegulationState, StrictnessLevel, SubjectKey, WindowCounters};
use crate::domain::ports::StateStore;

/// SQLite-backed regulation state rows.
#[derive(Clone)]
pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn find_latest(&self, key: &SubjectKey) -> DomainResult<Option<RegulationState>> {
        let row: Option<StateRow> = sqlx::query_as(
            r#"SELECT id, user_id, master_project_id, trust_score, current_level,
                      tasks_completed_7d, focus_sessions_7d, tasks_ignored_7d, drift_events_7d,
                      missed_deadlines_7d, abandoned_sessions_7d, overuse_events_7d,
                      last_calculated_at, applied_through, version, created_at, updated_at
               FROM regulation_state
               WHERE user_id = ? AND master_project_id IS ?
               ORDER BY updated_at DESC
               LIMIT 1"#
        )
        .bind(key.user_id.to_string())
        .bind(key.project_id.map(|id| id.to_string()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create(&self, state: &RegulationState) -> DomainResult<()> {
        let counters = &state.counters;

        sqlx::query(
            r#"INSERT INTO regulation_state (id, user_id, master_project_id, trust_score, current_level,
                   tasks_completed_7d, focus_sessions_7d, tasks_ignored_7d, drift_events_7d,
                   missed_deadlines_7d, abandoned_sessions_7d, overuse_events_7d,
                   last_calculated_at, applied_through, version, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#
        )
        .bind(state.id.to_string())
        .bind(state.user_id.to_string())
        .bind(state.master_project_id.map(|id| id.to_string()))
        .bind(i64::from(state.trust_score))
        .bind(i64::from(state.current_level.as_u8()))
        .bind(i64::from(counters.tasks_completed_7d))
        .bind(i64::from(counters.focus_sessions_7d))
        .bind(i64::from(counters.tasks_ignored_7d))
        .bind(i64::from(counters.drift_events_7d))
        .bind(i64::from(counters.missed_deadlines_7d))
        .bind(i64::from(counters.abandoned_sessions_7d))
        .bind(i64::from(counters.overuse_events_7d))
        .bind(state.last_calculated_at.map(format_datetime))
        .bind(state.applied_through)
        .bind(version_to_i64(state.version)?)
        .bind(format_datetime(state.created_at))
        .bind(format_datetime(state.updated_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, state: &RegulationState) -> DomainResult<()> {
        let counters = &state.counters;
        let expected_version = version_to_i64(state.version)?;

        let result = sqlx::query(
            r#"UPDATE regulation_state SET trust_score = ?, current_level = ?,
                   tasks_completed_7d = ?, focus_sessions_7d = ?, tasks_ignored_7d = ?,
                   drift_events_7d = ?, missed_deadlines_7d = ?, abandoned_sessions_7d = ?,
                   overuse_events_7d = ?, last_calculated_at = ?, applied_through = ?, updated_at = ?,
                   version = version + 1
               WHERE id = ? AND version = ?"#
        )
        .bind(i64::from(state.trust_score))
        .bind(i64::from(state.current_level.as_u8()))
        .bind(i64::from(counters.tasks_completed_7d))
        .bind(i64::from(counters.focus_sessions_7d))
        .bind(i64::from(counters.tasks_ignored_7d))
        .bind(i64::from(counters.drift_events_7d))
        .bind(i64::from(counters.missed_deadlines_7d))
        .bind(i64::from(counters.abandoned_sessions_7d))
        .bind(i64::from(counters.overuse_events_7d))
        .bind(state.last_calculated_at.map(format_datetime))
        .bind(state.applied_through)
        .bind(format_datetime(state.updated_at))
        .bind(state.id.to_string())
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConcurrencyConflict {
                entity: "regulation_state".to_string(),
                id: state.id.to_string(),
            });
        }

        Ok(())
    }
}

fn version_to_i64(version: u64) -> DomainResult<i64> {
    i64::try_from(version)
        .map_err(|_| DomainError::SerializationError(format!("version out of range: {version}")))
}

#[derive(sqlx::FromRow)]
struct StateRow {
    id: String,
    user_id: String,
    master_project_id: Option<String>,
    trust_score: i64,
    current_level: i64,
    tasks_completed_7d: i64,
    focus_sessions_7d: i64,
    tasks_ignored_7d: i64,
    drift_events_7d: i64,
    missed_deadlines_7d: i64,
    abandoned_sessions_7d: i64,
    overuse_events_7d: i64,
    last_calculated_at: Option<String>,
    applied_through: i64,
    version: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<StateRow> for RegulationState {
    type Error = DomainError;

    fn try_from(row: StateRow) -> Result<Self, Self::Error> {
        let level: u8 = narrow(row.current_level, "current_level")?;
        let current_level = StrictnessLevel::from_u8(level)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid level: {level}")))?;

        Ok(Self {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            master_project_id: parse_optional_uuid(row.master_project_id)?,
            trust_score: narrow(row.trust_score, "trust_score")?,
            current_level,
            counters: WindowCounters {
                tasks_completed_7d: narrow(row.tasks_completed_7d, "tasks_completed_7d")?,
                focus_sessions_7d: narrow(row.focus_sessions_7d, "focus_sessions_7d")?,
                tasks_ignored_7d: narrow(row.tasks_ignored_7d, "tasks_ignored_7d")?,
                drift_events_7d: narrow(row.drift_events_7d, "drift_events_7d")?,
                missed_deadlines_7d: narrow(row.missed_deadlines_7d, "missed_deadlines_7d")?,
                abandoned_sessions_7d: narrow(row.abandoned_sessions_7d, "abandoned_sessions_7d")?,
                overuse_events_7d: narrow(row.overuse_events_7d, "overuse_events_7d")?,
            },
            last_calculated_at: parse_optional_datetime(row.last_calculated_at)?,
            applied_through: row.applied_through,
            version: narrow(row.version, "version")?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
