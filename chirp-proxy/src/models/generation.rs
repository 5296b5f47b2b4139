//! Request bodies accepted by the HTTP API
//!
//! These are forwarded upstream as-is (after serialization), so field names
//! follow the upstream wire format. Optional fields serialize as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Model version used when a request does not name one
pub const DEFAULT_MODEL_VERSION: &str = "chirp-v3-0";

fn default_model_version() -> String {
    DEFAULT_MODEL_VERSION.to_string()
}

/// POST /generate body (custom mode: caller supplies lyrics, tags and title)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomModeGenerateParam {
    /// Lyrics text
    #[serde(alias = "lyrics")]
    pub prompt: String,
    /// Style descriptors
    pub tags: String,
    #[serde(default = "default_model_version")]
    pub mv: String,
    pub title: String,
    /// Clip to extend, if continuing an existing song
    #[serde(default)]
    pub continue_clip_id: Option<String>,
    /// Offset (seconds) in the continued clip
    #[serde(default)]
    pub continue_at: Option<f64>,
}

/// POST /generate/description-mode body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionModeGenerateParam {
    pub gpt_description_prompt: String,
    #[serde(default)]
    pub make_instrumental: bool,
    #[serde(default = "default_model_version")]
    pub mv: String,
    #[serde(default)]
    pub prompt: String,
}

/// POST /generate/lyrics body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateLyricsParam {
    pub prompt: String,
}

/// POST /generate/concat body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcatParam {
    pub clip_id: String,
}

/// Static envelope returned by GET /
#[derive(Debug, Clone, Serialize)]
pub struct ServiceResponse {
    pub code: i32,
    pub msg: String,
    pub data: Option<Value>,
}

impl Default for ServiceResponse {
    fn default() -> Self {
        Self {
            code: 0,
            msg: "success".to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_custom_mode_defaults() {
        let param: CustomModeGenerateParam =
            serde_json::from_value(json!({"prompt": "la la", "tags": "pop", "title": "T"})).unwrap();
        assert_eq!(param.mv, DEFAULT_MODEL_VERSION);
        assert!(param.continue_clip_id.is_none());
        assert!(param.continue_at.is_none());
    }

    #[test]
    fn test_custom_mode_accepts_lyrics_alias() {
        let param: CustomModeGenerateParam =
            serde_json::from_value(json!({"lyrics": "verse", "tags": "pop", "title": "T"})).unwrap();
        assert_eq!(param.prompt, "verse");

        // Forwarded under the upstream field name
        let wire = serde_json::to_value(&param).unwrap();
        assert_eq!(wire["prompt"], "verse");
        assert!(wire.get("lyrics").is_none());
    }

    #[test]
    fn test_description_mode_defaults() {
        let param: DescriptionModeGenerateParam =
            serde_json::from_value(json!({"gpt_description_prompt": "a sad song"})).unwrap();
        assert!(!param.make_instrumental);
        assert_eq!(param.prompt, "");
        assert_eq!(param.mv, DEFAULT_MODEL_VERSION);
    }

    #[test]
    fn test_service_response_shape() {
        let value = serde_json::to_value(ServiceResponse::default()).unwrap();
        assert_eq!(value, json!({"code": 0, "msg": "success", "data": null}));
    }
}
