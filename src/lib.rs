//! Keel - trust-score regulation engine
//!
//! Keel turns behavioral events (completed tasks, missed deadlines, drifting
//! sessions) into a bounded trust score, maps the score onto five strictness
//! levels and derives the feature gates a host application enforces.
//!
//! # Architecture
//!
//! Hexagonal layout:
//!
//! - **Domain Layer** (`domain`): models, scoring rules and port traits
//! - **Service Layer** (`services`): `RegulationService`, the public operations
//! - **Adapters** (`adapters`): SQLite implementations of the ports
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use keel::adapters::sqlite::{initialize_database, SqliteEventStore, SqliteStateStore};
//! use keel::{EventType, RegulationConfig, RegulationService, StaticSession};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = initialize_database("sqlite:.keel/keel.db", None).await?;
//!     let service = RegulationService::new(
//!         Arc::new(SqliteEventStore::new(pool.clone())),
//!         Arc::new(SqliteStateStore::new(pool)),
//!         Arc::new(StaticSession::authenticated(uuid::Uuid::new_v4())),
//!         RegulationConfig::default(),
//!     );
//!     let logged = service.log_event(EventType::FocusCompleted, None, None, None).await?;
//!     println!("trust score: {}", logged.outcome.state.trust_score);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    BehaviorCheck, BehaviorEnforcement, Capability, Config, EventType, PolicyDecision,
    RegulationConfig, RegulationEvent, RegulationState, StrictnessLevel, StrictnessLevelConfig,
    SubjectKey,
};
pub use domain::ports::{EventStore, SessionProvider, StateStore, StaticSession};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{LoggedEvent, RecomputeOutcome, RegulationService};
