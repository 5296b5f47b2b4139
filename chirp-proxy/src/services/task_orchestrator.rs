//! Asynchronous generation task orchestration
//!
//! `submit` records a pending task and queues a [`GenerationJob`]; a fixed pool
//! of worker routines drains the queue, calls upstream `generate`, and writes
//! the terminal record. The queue is unbounded, so submission never waits on
//! workers, and a queued job runs to completion regardless of what happens to
//! the HTTP request that created it.

use chirp_common::Error;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::upstream_client::{GenerationApi, UpstreamError};
use crate::models::{FailureKind, TaskFailure, TaskStatus};
use crate::store::TaskStore;

/// One queued generation call
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub task_id: String,
    /// Request body forwarded upstream; never contains the task id
    pub payload: Value,
    pub token: String,
}

impl From<&UpstreamError> for TaskFailure {
    fn from(err: &UpstreamError) -> Self {
        let kind = match err {
            UpstreamError::Network(_) => FailureKind::Network,
            UpstreamError::Status { .. } | UpstreamError::InvalidJson(_) => FailureKind::Upstream,
        };
        TaskFailure::new(kind, err.to_string())
    }
}

/// Creates tasks and runs their generation calls on a worker pool
#[derive(Clone)]
pub struct TaskOrchestrator {
    store: TaskStore,
    sender: Arc<RwLock<Option<mpsc::UnboundedSender<GenerationJob>>>>,
    workers: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl TaskOrchestrator {
    /// Spawn `worker_count` workers (at least one) and return a handle for submitting jobs
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(store: TaskStore, api: Arc<dyn GenerationApi>, worker_count: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel::<GenerationJob>();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..worker_count.max(1))
            .map(|worker_id| {
                let receiver = Arc::clone(&receiver);
                let api = Arc::clone(&api);
                let store = store.clone();
                tokio::spawn(worker_loop(worker_id, receiver, api, store))
            })
            .collect();

        tracing::info!(workers = worker_count.max(1), "Generation worker pool started");

        Self {
            store,
            sender: Arc::new(RwLock::new(Some(sender))),
            workers: Arc::new(Mutex::new(workers)),
        }
    }

    /// Accept a generation request
    ///
    /// Persists a pending record under a fresh task id, queues the job and
    /// returns the id without waiting for the upstream call.
    pub async fn submit(&self, mut payload: Value, token: String) -> chirp_common::Result<String> {
        let task_id = Uuid::new_v4().to_string();

        // Task ids are local bookkeeping; never forward one upstream
        if let Value::Object(map) = &mut payload {
            map.remove("task_id");
        }

        self.store.save(&task_id, TaskStatus::Pending, None).await?;

        let job = GenerationJob {
            task_id: task_id.clone(),
            payload,
            token,
        };

        let queued = match self.sender.read().await.as_ref() {
            Some(sender) => sender.send(job).is_ok(),
            None => false,
        };

        if !queued {
            let failure = TaskFailure::new(FailureKind::QueueClosed, "Generation queue is closed");
            self.store
                .save(&task_id, TaskStatus::Failed, Some(failure.to_result()))
                .await?;
            return Err(Error::Internal(failure.message));
        }

        tracing::info!(task_id = %task_id, "Generation task queued");

        Ok(task_id)
    }

    /// Stop accepting jobs and wait for workers to finish the queued ones
    pub async fn shutdown(&self) {
        self.sender.write().await.take();

        let workers: Vec<JoinHandle<()>> = self.workers.lock().await.drain(..).collect();
        for worker in workers {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "Generation worker terminated abnormally");
            }
        }

        tracing::info!("Generation worker pool stopped");
    }
}

async fn worker_loop(
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<GenerationJob>>>,
    api: Arc<dyn GenerationApi>,
    store: TaskStore,
) {
    loop {
        let job = receiver.lock().await.recv().await;
        let Some(job) = job else {
            break;
        };

        tracing::debug!(worker_id, task_id = %job.task_id, "Worker picked up job");
        run_job(Arc::clone(&api), &store, job).await;
    }

    tracing::debug!(worker_id, "Generation worker exiting");
}

/// Execute one job and write its terminal record
async fn run_job(api: Arc<dyn GenerationApi>, store: &TaskStore, job: GenerationJob) {
    let GenerationJob {
        task_id,
        payload,
        token,
    } = job;

    // Run the call in its own task so a panic is captured as a failure
    let call = tokio::spawn(async move { api.generate(&payload, &token).await });

    let outcome = match call.await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(TaskFailure::from(&e)),
        Err(e) => Err(TaskFailure::new(FailureKind::Internal, e.to_string())),
    };

    let write = match outcome {
        Ok(result) => {
            tracing::info!(task_id = %task_id, "Generation task completed");
            store.save(&task_id, TaskStatus::Completed, Some(result)).await
        }
        Err(failure) => {
            tracing::warn!(
                task_id = %task_id,
                kind = ?failure.kind,
                error = %failure.message,
                "Generation task failed"
            );
            store
                .save(&task_id, TaskStatus::Failed, Some(failure.to_result()))
                .await
        }
    };

    if let Err(e) = write {
        tracing::error!(task_id = %task_id, error = %e, "Failed to persist terminal task record");
    }
}
