//! Regulation state store port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{RegulationState, SubjectKey};

/// Persistence for `RegulationState` rows.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// The most recently updated state for `key`, if any.
    ///
    /// Duplicate rows for a key are tolerated; only the newest is returned.
    async fn find_latest(&self, key: &SubjectKey) -> DomainResult<Option<RegulationState>>;

    /// Insert a new state row.
    async fn create(&self, state: &RegulationState) -> DomainResult<()>;

    /// Conditionally overwrite a state row.
    ///
    /// The write only applies when the stored version still equals
    /// `state.version`; the stored version is then incremented. Returns
    /// `DomainError::ConcurrencyConflict` when another writer got there first.
    async fn update(&self, state: &RegulationState) -> DomainResult<()>;
}
