//! SQLite implementation of the EventStore port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{format_datetime, narrow, parse_datetime, parse_optional_uuid, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{EventType, RegulationEvent, SubjectKey};
use crate::domain::ports::EventStore;

const EVENT_COLUMNS: &str =
    "sequence, id, user_id, master_project_id, event_type, severity, impact_on_trust, metadata, created_at";

/// SQLite-backed regulation event log.
#[derive(Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn append(&self, event: &RegulationEvent) -> DomainResult<i64> {
        let metadata_json = serde_json::to_string(&event.metadata)?;

        let result = sqlx::query(
            r#"INSERT INTO regulation_events (id, user_id, master_project_id, event_type, severity, impact_on_trust, metadata, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#
        )
        .bind(event.id.to_string())
        .bind(event.user_id.to_string())
        .bind(event.master_project_id.map(|id| id.to_string()))
        .bind(event.event_type.as_str())
        .bind(i64::from(event.severity))
        .bind(i64::from(event.impact_on_trust))
        .bind(&metadata_json)
        .bind(format_datetime(event.created_at))
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list_since(
        &self,
        key: &SubjectKey,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<RegulationEvent>> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM regulation_events
             WHERE user_id = ? AND master_project_id IS ? AND created_at >= ?
             ORDER BY created_at ASC, sequence ASC"
        ))
        .bind(key.user_id.to_string())
        .bind(key.project_id.map(|id| id.to_string()))
        .bind(format_datetime(since))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_user_events_since(
        &self,
        user_id: Uuid,
        event_type: EventType,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<RegulationEvent>> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM regulation_events
             WHERE user_id = ? AND event_type = ? AND created_at >= ?
             ORDER BY created_at ASC, sequence ASC"
        ))
        .bind(user_id.to_string())
        .bind(event_type.as_str())
        .bind(format_datetime(since))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn recent(&self, key: &SubjectKey, limit: u32) -> DomainResult<Vec<RegulationEvent>> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM regulation_events
             WHERE user_id = ? AND master_project_id IS ?
             ORDER BY created_at DESC, sequence DESC
             LIMIT ?"
        ))
        .bind(key.user_id.to_string())
        .bind(key.project_id.map(|id| id.to_string()))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    sequence: i64,
    id: String,
    user_id: String,
    master_project_id: Option<String>,
    event_type: String,
    severity: i64,
    impact_on_trust: i64,
    metadata: Option<String>,
    created_at: String,
}

impl TryFrom<EventRow> for RegulationEvent {
    type Error = DomainError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let event_type = EventType::from_str(&row.event_type)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid event type: {}", row.event_type)))?;

        let metadata = row
            .metadata
            .map(|s| serde_json::from_str(&s))
            .transpose()?
            .unwrap_or_else(|| serde_json::json!({}));

        Ok(Self {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            master_project_id: parse_optional_uuid(row.master_project_id)?,
            event_type,
            severity: narrow(row.severity, "severity")?,
            impact_on_trust: narrow(row.impact_on_trust, "impact_on_trust")?,
            metadata,
            created_at: parse_datetime(&row.created_at)?,
            sequence: Some(row.sequence),
        })
    }
}
