//! Domain errors for the Keel regulation engine.

use thiserror::Error;

/// Domain-level errors that can occur in the regulation engine.
///
/// Policy denials (override refused, capability gated) are not errors; they
/// are returned as `PolicyDecision` / `BehaviorCheck` values.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not authenticated: no user session is available")]
    NotAuthenticated,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Concurrency conflict: {entity} {id} was modified")]
    ConcurrencyConflict { entity: String, id: String },
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
