//! File-backed task record store
//!
//! One JSON file per task id (`<dir>/<task_id>.json`). A save fully replaces the
//! previous record; there is no history and no expiry. Each id has a single
//! writer (the worker that owns the task), so no locking is done here.

use chirp_common::{time, Error, Result};
use serde_json::Value;
use std::path::PathBuf;

use crate::models::{TaskRecord, TaskStatus};

/// Durable store for task records
#[derive(Debug, Clone)]
pub struct TaskStore {
    dir: PathBuf,
}

impl TaskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write a record for `task_id`, replacing any previous one
    ///
    /// The record is written to a temporary file and renamed into place, so
    /// readers see either the old or the new record.
    pub async fn save(
        &self,
        task_id: &str,
        status: TaskStatus,
        result: Option<Value>,
    ) -> Result<TaskRecord> {
        if !is_valid_task_id(task_id) {
            return Err(Error::InvalidInput(format!("Invalid task id: {:?}", task_id)));
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let record = TaskRecord {
            status,
            result,
            timestamp: time::unix_seconds(),
        };
        let bytes = serde_json::to_vec(&record)?;

        let path = self.record_path(task_id);
        let tmp_path = self.dir.join(format!("{}.json.tmp", task_id));
        tokio::fs::write(&tmp_path, &bytes).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::debug!(task_id = %task_id, status = ?status, "Task record saved");

        Ok(record)
    }

    /// Load the current record for `task_id`
    ///
    /// Unknown ids (including ids that could not have been issued) are `NotFound`.
    pub async fn load(&self, task_id: &str) -> Result<TaskRecord> {
        if !is_valid_task_id(task_id) {
            return Err(Error::NotFound(format!("Task not found: {}", task_id)));
        }

        let bytes = match tokio::fs::read(self.record_path(task_id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(format!("Task not found: {}", task_id)));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn record_path(&self, task_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", task_id))
    }
}

/// Task ids are used as file names: allow only `[A-Za-z0-9_-]`
fn is_valid_task_id(task_id: &str) -> bool {
    !task_id.is_empty()
        && task_id.len() <= 128
        && task_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
