//! Common test utilities for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use keel::adapters::sqlite::{initialize_database, SqliteEventStore, SqliteStateStore};
use keel::{RegulationConfig, RegulationService, StaticSession};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

pub type Service = RegulationService<SqliteEventStore, SqliteStateStore>;

/// A migrated file-backed database in a temporary directory.
///
/// Keep the `TempDir` alive for as long as the pool is used.
pub async fn file_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite:{}", dir.path().join("keel.db").display());
    let pool = initialize_database(&url, None)
        .await
        .expect("Failed to initialize database");
    (dir, pool)
}

/// A regulation service acting as `user_id`, or anonymously for `None`.
pub fn service(pool: &SqlitePool, user_id: Option<Uuid>) -> Service {
    service_with(pool, user_id, RegulationConfig::default())
}

pub fn service_with(pool: &SqlitePool, user_id: Option<Uuid>, settings: RegulationConfig) -> Service {
    RegulationService::new(
        Arc::new(SqliteEventStore::new(pool.clone())),
        Arc::new(SqliteStateStore::new(pool.clone())),
        Arc::new(StaticSession::new(user_id)),
        settings,
    )
}
