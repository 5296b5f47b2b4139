//! Task record state
//!
//! A task is created `pending` when a generation request is accepted and moves
//! exactly once to `completed` or `failed`:
//!
//! PENDING → COMPLETED | FAILED

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Lifecycle state of a generation task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Accepted, background generation not yet resolved
    Pending,
    /// Upstream generation returned a result
    Completed,
    /// Upstream generation (or the worker) failed
    Failed,
}

impl TaskStatus {
    /// Returns true once the task can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// Persisted record for one task id
///
/// Serialized as `{"status": ..., "result": ..., "timestamp": ...}`. `result` is
/// written as `null` while pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub status: TaskStatus,
    pub result: Option<Value>,
    /// Unix seconds (fractional) of the last write
    pub timestamp: f64,
}

/// Category of a background generation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Upstream answered with an error status or an unparseable body
    Upstream,
    /// Upstream could not be reached
    Network,
    /// The job queue was closed before the job could be scheduled
    QueueClosed,
    /// The worker itself failed (e.g. the generation call panicked)
    Internal,
}

/// Typed failure captured by a worker
///
/// Only the message reaches the persisted record, as `{"error": message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl TaskFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Value stored in the task record's `result` field
    pub fn to_result(&self) -> Value {
        json!({ "error": self.message })
    }
}

impl std::fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}
