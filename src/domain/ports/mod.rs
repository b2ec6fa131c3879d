//! Port trait definitions (Hexagonal Architecture)
//!
//! Interfaces that infrastructure adapters implement:
//! - EventStore: append-only regulation event log
//! - StateStore: per-(user, project) regulation state rows
//! - SessionProvider: identity of the acting user
//!
//! Scoring and level logic depend only on these traits, so it can be
//! exercised without a database.

pub mod event_store;
pub mod session;
pub mod state_store;

pub use event_store::EventStore;
pub use session::{SessionProvider, StaticSession};
pub use state_store::StateStore;
