//! Regulation event store port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EventType, RegulationEvent, SubjectKey};

/// Append-only log of regulation events.
///
/// Events are never updated or deleted. Keyed queries are scoped to one
/// (user, project) pair; a `None` project only matches events logged without
/// a project.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append one event, returning the sequence the log assigned to it.
    ///
    /// Sequences increase in append order.
    async fn append(&self, event: &RegulationEvent) -> DomainResult<i64>;

    /// Events created at or after `since`, oldest first.
    async fn list_since(
        &self,
        key: &SubjectKey,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<RegulationEvent>>;

    /// Events of one type for a user, across all of their projects, created
    /// at or after `since`, oldest first.
    async fn list_user_events_since(
        &self,
        user_id: Uuid,
        event_type: EventType,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<RegulationEvent>>;

    /// The `limit` most recent events, newest first.
    async fn recent(&self, key: &SubjectKey, limit: u32) -> DomainResult<Vec<RegulationEvent>>;
}
