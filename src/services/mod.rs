//! Application services coordinating the domain and its ports.

pub mod regulation_service;

pub use regulation_service::{LoggedEvent, RecomputeOutcome, RegulationService};
