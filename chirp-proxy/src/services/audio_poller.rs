//! Clip audio polling
//!
//! Generated clips become playable some time after the generation call
//! returns. [`AudioPoller`] looks a clip up at a fixed cadence until it carries
//! an `audio_url`, reports `status == "failed"`, or the attempt budget runs out.
//! Worst case with the defaults is about two minutes per clip.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::upstream_client::{GenerationApi, UpstreamError};

pub const DEFAULT_MAX_RETRIES: u32 = 60;
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_secs(2);

/// Terminal outcomes of waiting on a clip other than success
#[derive(Debug, Error)]
pub enum PollError {
    #[error("Generation failed for clip {0}")]
    GenerationFailed(String),

    #[error("Timeout waiting for audio for clip {0}")]
    Timeout(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Sequential fixed-interval poller for clip audio
pub struct AudioPoller {
    api: Arc<dyn GenerationApi>,
    max_retries: u32,
    delay: Duration,
}

impl AudioPoller {
    pub fn new(api: Arc<dyn GenerationApi>) -> Self {
        Self {
            api,
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_POLL_DELAY,
        }
    }

    /// Override the attempt budget and the delay between attempts
    pub fn with_policy(mut self, max_retries: u32, delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.delay = delay;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Poll a clip until its audio URL is available
    ///
    /// Returns on the first lookup carrying a non-empty `audio_url`. A lookup
    /// with `status == "failed"` ends polling immediately. Lookup errors are
    /// propagated without retry.
    pub async fn wait_for_audio(&self, clip_id: &str, token: &str) -> Result<String, PollError> {
        for attempt in 1..=self.max_retries {
            let clip = self.api.get_clip(clip_id, token).await?;

            if let Some(url) = audio_url(&clip) {
                tracing::info!(clip_id = %clip_id, attempt, "Clip audio ready");
                return Ok(url.to_string());
            }

            if clip.get("status").and_then(Value::as_str) == Some("failed") {
                return Err(PollError::GenerationFailed(clip_id.to_string()));
            }

            tracing::debug!(clip_id = %clip_id, attempt, "Clip audio not ready yet");

            if attempt < self.max_retries {
                tokio::time::sleep(self.delay).await;
            }
        }

        Err(PollError::Timeout(clip_id.to_string()))
    }

    /// Collect audio URLs for every clip of a generation
    ///
    /// Clips are awaited one after another. A clip that fails or times out is
    /// logged and skipped, so the result may be shorter than the clip list;
    /// successful URLs keep clip order.
    pub async fn generation_audio(
        &self,
        generation_id: &str,
        token: &str,
    ) -> Result<Vec<String>, UpstreamError> {
        let page = self.api.get_feed_page(generation_id, token).await?;
        let clips = page
            .get("clips")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut audio_urls = Vec::with_capacity(clips.len());

        for clip in &clips {
            let Some(clip_id) = clip.get("id").and_then(Value::as_str) else {
                tracing::warn!(generation_id = %generation_id, "Skipping clip without id");
                continue;
            };

            match self.wait_for_audio(clip_id, token).await {
                Ok(url) => audio_urls.push(url),
                Err(e) => {
                    tracing::error!(
                        generation_id = %generation_id,
                        clip_id = %clip_id,
                        error = %e,
                        "Error getting audio for clip"
                    );
                }
            }
        }

        Ok(audio_urls)
    }
}

fn audio_url(clip: &Value) -> Option<&str> {
    clip.get("audio_url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
}
