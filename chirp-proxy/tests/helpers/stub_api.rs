//! In-process stand-in for the upstream generation API

use async_trait::async_trait;
use chirp_proxy::services::{AudioPoller, GenerationApi, TaskOrchestrator, UpstreamError};
use chirp_proxy::store::TaskStore;
use chirp_proxy::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Records every call and answers with canned JSON
///
/// - `generate` fails when the payload title is `"fail"`; when gated it waits
///   for `release_generation` before answering
/// - `get_clip("broken")` fails; other clips are ready immediately
/// - `get_feed_page("gen-1")` lists clips `a`, `broken`, `c`
pub struct StubApi {
    pub calls: Mutex<Vec<(String, String, String)>>,
    pub payloads: Mutex<Vec<Value>>,
    gate: Option<Semaphore>,
}

impl StubApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            payloads: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Hold every `generate` call until released
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub fn release_generation(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    fn record(&self, op: &str, arg: &str, token: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((op.to_string(), arg.to_string(), token.to_string()));
    }

    pub fn calls_named(&self, op: &str) -> Vec<(String, String, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _, _)| name == op)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GenerationApi for StubApi {
    async fn generate(&self, payload: &Value, token: &str) -> Result<Value, UpstreamError> {
        self.record("generate", "", token);
        self.payloads.lock().unwrap().push(payload.clone());

        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.expect("gate closed");
            permit.forget();
        }

        if payload["title"] == "fail" {
            return Err(UpstreamError::Status {
                status: 500,
                body: "generator offline".to_string(),
            });
        }

        Ok(json!({
            "id": "gen-1",
            "clips": [{"id": "a", "title": payload["title"]}],
            "status": "submitted"
        }))
    }

    async fn concat(&self, payload: &Value, token: &str) -> Result<Value, UpstreamError> {
        self.record("concat", payload["clip_id"].as_str().unwrap_or(""), token);
        Ok(json!({"id": "concat-1", "is_concat": true}))
    }

    async fn generate_lyrics(&self, prompt: &str, token: &str) -> Result<Value, UpstreamError> {
        self.record("generate_lyrics", prompt, token);
        Ok(json!({"id": "lyr-1"}))
    }

    async fn get_lyrics(&self, lyrics_id: &str, token: &str) -> Result<Value, UpstreamError> {
        self.record("get_lyrics", lyrics_id, token);
        if lyrics_id == "missing" {
            return Err(UpstreamError::Status {
                status: 404,
                body: "{\"detail\":\"Not found\"}".to_string(),
            });
        }
        Ok(json!({"id": lyrics_id, "status": "complete", "text": "[Verse]\nhello"}))
    }

    async fn get_clip(&self, clip_id: &str, token: &str) -> Result<Value, UpstreamError> {
        self.record("get_clip", clip_id, token);
        if clip_id == "broken" {
            return Err(UpstreamError::InvalidJson("<html>502 Bad Gateway</html>".to_string()));
        }
        Ok(json!({
            "id": clip_id,
            "status": "complete",
            "audio_url": format!("https://cdn.example.com/{}.mp3", clip_id)
        }))
    }

    async fn get_feed_page(&self, ids: &str, token: &str) -> Result<Value, UpstreamError> {
        self.record("get_feed_page", ids, token);
        if ids == "gen-1" {
            return Ok(json!({"clips": [{"id": "a"}, {"id": "broken"}, {"id": "c"}]}));
        }
        Ok(json!({"clips": [], "num_total_results": 0}))
    }
}

/// Router plus the pieces a test may want to inspect
pub struct TestApp {
    pub router: axum::Router,
    pub state: AppState,
    pub api: Arc<StubApi>,
    pub _tasks_dir: tempfile::TempDir,
}

/// Build the full router over a stub upstream and a temporary task directory
pub fn create_test_app(api: StubApi) -> TestApp {
    let tasks_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let api = Arc::new(api);
    let dyn_api: Arc<dyn GenerationApi> = api.clone();

    let store = TaskStore::new(tasks_dir.path());
    let orchestrator = TaskOrchestrator::start(store.clone(), Arc::clone(&dyn_api), 2);
    let poller = AudioPoller::new(Arc::clone(&dyn_api)).with_policy(3, Duration::from_millis(1));

    let state = AppState::new(dyn_api, store, orchestrator, poller);
    let router = build_router(state.clone());

    TestApp {
        router,
        state,
        api,
        _tasks_dir: tasks_dir,
    }
}
