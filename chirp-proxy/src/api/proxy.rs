//! Synchronous proxy endpoints
//!
//! Each handler makes one upstream call and returns its JSON unchanged. Any
//! failure becomes a 500 with the error message as `detail`.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use super::auth::BearerToken;
use crate::error::{ApiError, ApiResult};
use crate::models::{ConcatParam, DescriptionModeGenerateParam, GenerateLyricsParam};
use crate::AppState;

fn to_payload<T: serde::Serialize>(request: &T) -> ApiResult<Value> {
    serde_json::to_value(request)
        .map_err(|e| ApiError::Internal(format!("Failed to encode request: {}", e)))
}

/// POST /generate/description-mode
pub async fn generate_from_description(
    State(state): State<AppState>,
    token: BearerToken,
    Json(request): Json<DescriptionModeGenerateParam>,
) -> ApiResult<Json<Value>> {
    let payload = to_payload(&request)?;
    Ok(Json(state.api.generate(&payload, token.as_str()).await?))
}

/// GET /feed/{aid}
///
/// Single clip lookup, answered as a one-element list.
pub async fn fetch_feed(
    State(state): State<AppState>,
    token: BearerToken,
    Path(aid): Path<String>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.api.get_feed(&aid, token.as_str()).await?))
}

/// GET /feeds/{aid}
///
/// Feed lookup answered with the `clips` array, or the raw payload when
/// upstream sends none.
pub async fn fetch_feeds(
    State(state): State<AppState>,
    token: BearerToken,
    Path(aid): Path<String>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.api.get_feeds(&aid, token.as_str()).await?))
}

/// POST /generate/lyrics/
pub async fn generate_lyrics(
    State(state): State<AppState>,
    token: BearerToken,
    Json(request): Json<GenerateLyricsParam>,
) -> ApiResult<Json<Value>> {
    Ok(Json(
        state
            .api
            .generate_lyrics(&request.prompt, token.as_str())
            .await?,
    ))
}

/// GET /lyrics/{lid}
pub async fn fetch_lyrics(
    State(state): State<AppState>,
    token: BearerToken,
    Path(lid): Path<String>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.api.get_lyrics(&lid, token.as_str()).await?))
}

/// POST /generate/concat
pub async fn concat_clips(
    State(state): State<AppState>,
    token: BearerToken,
    Json(request): Json<ConcatParam>,
) -> ApiResult<Json<Value>> {
    let payload = to_payload(&request)?;
    Ok(Json(state.api.concat(&payload, token.as_str()).await?))
}

/// GET /audio/{generation_id}
///
/// Waits for every clip of a generation and returns the audio URLs that became
/// available. Blocks the caller for as long as polling takes (up to
/// `max_retries * delay` per clip); clips that fail are left out.
pub async fn fetch_generation_audio(
    State(state): State<AppState>,
    token: BearerToken,
    Path(generation_id): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    let urls = state
        .poller
        .generation_audio(&generation_id, token.as_str())
        .await?;

    tracing::info!(
        generation_id = %generation_id,
        ready = urls.len(),
        "Generation audio collected"
    );

    Ok(Json(urls))
}

/// Build synchronous proxy routes
pub fn proxy_routes() -> Router<AppState> {
    Router::new()
        .route("/generate/description-mode", post(generate_from_description))
        .route("/feed/:aid", get(fetch_feed))
        .route("/feeds/:aid", get(fetch_feeds))
        .route("/generate/lyrics/", post(generate_lyrics))
        .route("/generate/lyrics", post(generate_lyrics))
        .route("/lyrics/:lid", get(fetch_lyrics))
        .route("/generate/concat", post(concat_clips))
        .route("/audio/:generation_id", get(fetch_generation_audio))
}
