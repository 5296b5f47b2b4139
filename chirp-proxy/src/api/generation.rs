//! Asynchronous generation endpoints
//!
//! POST /generate queues a task and answers immediately; clients then poll
//! GET /status/{task_id} until the record turns `completed` or `failed`.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::auth::BearerToken;
use crate::error::{ApiError, ApiResult};
use crate::models::{CustomModeGenerateParam, TaskRecord, TaskStatus};
use crate::AppState;

/// POST /generate response
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub task_id: String,
    pub status: TaskStatus,
}

/// POST /generate
///
/// Persists a pending record and hands the upstream call to the worker pool.
/// Upstream errors never show up here; they land in the task record.
pub async fn submit_generation(
    State(state): State<AppState>,
    token: BearerToken,
    Json(request): Json<CustomModeGenerateParam>,
) -> ApiResult<Json<SubmitResponse>> {
    let payload = serde_json::to_value(&request)
        .map_err(|e| ApiError::Internal(format!("Failed to encode request: {}", e)))?;

    let task_id = state.orchestrator.submit(payload, token.0).await?;

    tracing::info!(task_id = %task_id, title = %request.title, "Generation submitted");

    Ok(Json(SubmitResponse {
        task_id,
        status: TaskStatus::Pending,
    }))
}

/// GET /status/{task_id}
pub async fn get_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<TaskRecord>> {
    match state.store.load(&task_id).await {
        Ok(record) => {
            tracing::debug!(task_id = %task_id, status = ?record.status, "Status query");
            Ok(Json(record))
        }
        Err(chirp_common::Error::NotFound(_)) => Err(ApiError::NotFound("Task not found".to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Build generation routes
pub fn generation_routes() -> Router<AppState> {
    Router::new()
        .route("/generate", post(submit_generation))
        .route("/status/:task_id", get(get_task_status))
}
