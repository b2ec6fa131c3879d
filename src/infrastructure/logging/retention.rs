//! Log file retention
//!
//! Daily rolling files accumulate as `keel.log.YYYY-MM-DD`; files whose
//! modification time falls outside the retention period are deleted.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::path::Path;
use tracing::{debug, info, warn};

use super::logger::LOG_FILE_NAME;

/// Delete rolled log files in `log_dir` older than `retention_days`.
///
/// Returns the number of files deleted. Files that do not carry the log
/// file prefix are left alone.
pub async fn prune_old_logs(log_dir: impl AsRef<Path>, retention_days: u32) -> Result<usize> {
    let log_dir = log_dir.as_ref();

    if !log_dir.exists() {
        debug!(path = %log_dir.display(), "log directory does not exist yet");
        return Ok(0);
    }

    let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
    let mut deleted_count = 0;

    let mut entries = tokio::fs::read_dir(log_dir)
        .await
        .context("failed to read log directory")?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .context("failed to read directory entry")?
    {
        let path = entry.path();
        let is_log_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_NAME));
        if !is_log_file {
            continue;
        }

        let modified: DateTime<Utc> = match tokio::fs::metadata(&path).await.and_then(|m| m.modified()) {
            Ok(modified) => modified.into(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping log file without modification time");
                continue;
            }
        };

        if modified < cutoff {
            tokio::fs::remove_file(&path)
                .await
                .context("failed to delete old log file")?;
            debug!(path = %path.display(), "deleted old log file");
            deleted_count += 1;
        }
    }

    if deleted_count > 0 {
        info!(count = deleted_count, "cleaned up old log files");
    }

    Ok(deleted_count)
}
