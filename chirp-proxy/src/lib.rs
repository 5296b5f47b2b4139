//! chirp-proxy library interface
//!
//! Exposes the application state and router so integration tests can drive
//! the service in-process.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod prompts;
pub mod services;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{AudioPoller, GenerationApi, TaskOrchestrator};
use crate::store::TaskStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Upstream generation API
    pub api: Arc<dyn GenerationApi>,
    /// Task record store read by GET /status
    pub store: TaskStore,
    /// Background generation worker pool
    pub orchestrator: TaskOrchestrator,
    /// Clip audio poller
    pub poller: Arc<AudioPoller>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        api: Arc<dyn GenerationApi>,
        store: TaskStore,
        orchestrator: TaskOrchestrator,
        poller: AudioPoller,
    ) -> Self {
        Self {
            api,
            store,
            orchestrator,
            poller: Arc::new(poller),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// CORS is fully permissive: any origin (echoed back, so credentials work),
/// any method, any header.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::generation_routes())
        .merge(api::proxy_routes())
        .merge(api::prompt_routes())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
