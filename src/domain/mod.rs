//! Domain layer for the Keel regulation engine
//!
//! Pure scoring, level and enforcement rules plus the ports the service
//! layer persists through.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
