//! Upstream generation API client
//!
//! Thin JSON-in/JSON-out wrapper over the third-party music generation API.
//! Every request carries the caller's bearer token plus fixed browser-like
//! headers. There is no retry here: one failed call is one error.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";
pub const REFERER_URL: &str = "https://suno.com/";
pub const ORIGIN_URL: &str = "https://suno.com";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Upstream client errors
///
/// Response bodies are preserved verbatim so callers can surface them.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Upstream returned non-JSON body: {0}")]
    InvalidJson(String),
}

/// Connection settings for [`UpstreamClient`]
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL without trailing slash, e.g. `https://studio-api.example.com`
    pub base_url: String,
    pub timeout: Duration,
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Operations offered by the upstream generation service
///
/// `get_feed` and `get_feeds` are built on the primitive lookups and normalize
/// their responses differently (see their docs). The inconsistency is kept for
/// client compatibility.
#[async_trait]
pub trait GenerationApi: Send + Sync {
    /// POST /api/generate/v2/
    async fn generate(&self, payload: &Value, token: &str) -> Result<Value, UpstreamError>;

    /// POST /api/generate/concat/v2/
    async fn concat(&self, payload: &Value, token: &str) -> Result<Value, UpstreamError>;

    /// POST /api/generate/lyrics/
    async fn generate_lyrics(&self, prompt: &str, token: &str) -> Result<Value, UpstreamError>;

    /// GET /api/generate/lyrics/{id}
    async fn get_lyrics(&self, lyrics_id: &str, token: &str) -> Result<Value, UpstreamError>;

    /// GET /api/clip/{id}
    async fn get_clip(&self, clip_id: &str, token: &str) -> Result<Value, UpstreamError>;

    /// GET /api/feed/v2?ids={ids}, unmodified
    async fn get_feed_page(&self, ids: &str, token: &str) -> Result<Value, UpstreamError>;

    /// Clip lookup wrapped into a one-element list
    async fn get_feed(&self, clip_id: &str, token: &str) -> Result<Value, UpstreamError> {
        let clip = self.get_clip(clip_id, token).await?;
        Ok(Value::Array(vec![clip]))
    }

    /// Feed lookup returning the `clips` array when present and non-empty,
    /// otherwise the raw payload
    async fn get_feeds(&self, ids: &str, token: &str) -> Result<Value, UpstreamError> {
        let page = self.get_feed_page(ids, token).await?;
        Ok(unwrap_clips(page))
    }
}

/// Extract a truthy `clips` member, or pass the payload through unchanged
pub fn unwrap_clips(page: Value) -> Value {
    match page {
        Value::Object(mut map) => match map.remove("clips") {
            Some(clips) if is_truthy(&clips) => clips,
            Some(clips) => {
                map.insert("clips".to_string(), clips);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// reqwest-backed implementation of [`GenerationApi`]
pub struct UpstreamClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static(REFERER_URL));
        headers.insert(ORIGIN, HeaderValue::from_static(ORIGIN_URL));

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json(&self, path: &str, body: &Value, token: &str) -> Result<Value, UpstreamError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "POST upstream");
        self.send(self.http_client.post(&url).json(body), token).await
    }

    async fn get_json(&self, path: &str, token: &str) -> Result<Value, UpstreamError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET upstream");
        self.send(self.http_client.get(&url), token).await
    }

    async fn send(&self, request: reqwest::RequestBuilder, token: &str) -> Result<Value, UpstreamError> {
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Upstream returned error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|_| UpstreamError::InvalidJson(body))
    }
}

#[async_trait]
impl GenerationApi for UpstreamClient {
    async fn generate(&self, payload: &Value, token: &str) -> Result<Value, UpstreamError> {
        self.post_json("/api/generate/v2/", payload, token).await
    }

    async fn concat(&self, payload: &Value, token: &str) -> Result<Value, UpstreamError> {
        self.post_json("/api/generate/concat/v2/", payload, token).await
    }

    async fn generate_lyrics(&self, prompt: &str, token: &str) -> Result<Value, UpstreamError> {
        let body = json!({ "prompt": prompt, "lyrics_model": "default" });
        self.post_json("/api/generate/lyrics/", &body, token).await
    }

    async fn get_lyrics(&self, lyrics_id: &str, token: &str) -> Result<Value, UpstreamError> {
        self.get_json(&format!("/api/generate/lyrics/{}", lyrics_id), token)
            .await
    }

    async fn get_clip(&self, clip_id: &str, token: &str) -> Result<Value, UpstreamError> {
        self.get_json(&format!("/api/clip/{}", clip_id), token).await
    }

    async fn get_feed_page(&self, ids: &str, token: &str) -> Result<Value, UpstreamError> {
        // Comma-separated ids go out unencoded: `?ids=a,b`
        self.get_json(&format!("/api/feed/v2?ids={}", ids), token).await
    }
}
