//! Prompt formatting endpoint
//!
//! Builds a ready-to-send v4 generation body without calling upstream.

use axum::{routing::post, Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiResult;
use crate::prompts::{create_generation_request, format_song};
use crate::AppState;

const DEFAULT_STYLE: &str = "french_acoustic";

/// POST /prompts/format body
#[derive(Debug, Deserialize)]
pub struct FormatSongRequest {
    pub title: String,
    pub lyrics: String,
    /// Named style; ignored when `tags` is given
    #[serde(default)]
    pub style: Option<String>,
    /// Explicit style tags: lyrics are used verbatim
    #[serde(default)]
    pub tags: Option<String>,
}

/// POST /prompts/format
pub async fn format_prompt(Json(request): Json<FormatSongRequest>) -> ApiResult<Json<Value>> {
    let body = match request.tags {
        Some(tags) => create_generation_request(&request.title, &tags, &request.lyrics),
        None => format_song(
            &request.title,
            &request.lyrics,
            request.style.as_deref().unwrap_or(DEFAULT_STYLE),
        )?,
    };

    Ok(Json(body))
}

/// Build prompt routes
pub fn prompt_routes() -> Router<AppState> {
    Router::new().route("/prompts/format", post(format_prompt))
}
