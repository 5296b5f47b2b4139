//! Generation request builders
//!
//! Helpers for producing complete v4 generation bodies from a title, style
//! tags and lyrics, plus a song formatter that adds section markers and
//! musical directions for a named style.

use serde_json::{json, Value};
use thiserror::Error;

pub const MAJOR_MODEL_VERSION: &str = "v4";
pub const MODEL_NAME: &str = "chirp-v4";

/// Marker terminating a formatted song
const END_MARKER: &str = "[end]";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Unknown song style: {0} (available: {styles})", styles = style_names())]
    UnknownStyle(String),
}

/// Musical directions used when formatting a song in a given style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleDirections {
    pub name: &'static str,
    pub tags: &'static str,
    pub intro_instrument: &'static str,
    pub intro_mood: &'static str,
}

impl StyleDirections {
    /// `[Intro][<instrument>, <mood>]`
    pub fn intro(&self) -> String {
        format!("[Intro][{}, {}]", self.intro_instrument, self.intro_mood)
    }
}

const STYLES: &[StyleDirections] = &[StyleDirections {
    name: "french_acoustic",
    tags: "acoustic pop french female soft",
    intro_instrument: "Guitare douce",
    intro_mood: "mélodie chaleureuse",
}];

/// Look up a style by name
pub fn style(name: &str) -> Result<&'static StyleDirections, PromptError> {
    STYLES
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| PromptError::UnknownStyle(name.to_string()))
}

/// Comma-separated names of all known styles
fn style_names() -> String {
    STYLES.iter().map(|s| s.name).collect::<Vec<_>>().join(", ")
}

/// Build a complete v4 generation request body
pub fn create_generation_request(title: &str, tags: &str, lyrics: &str) -> Value {
    json!({
        "title": title,
        "metadata": {
            "tags": tags,
            "prompt": lyrics,
            "type": "gen",
            "stream": true,
        },
        "major_model_version": MAJOR_MODEL_VERSION,
        "model_name": MODEL_NAME,
        "batch_size": 1,
    })
}

/// Format lyrics for a style and wrap them into a generation request
///
/// The style's intro marker is prepended. Lyrics already finishing with
/// `[end]` (ignoring surrounding whitespace) are kept as given; otherwise they
/// are trimmed and `[end]` is appended on its own line.
pub fn format_song(title: &str, lyrics: &str, style_name: &str) -> Result<Value, PromptError> {
    let directions = style(style_name)?;

    let body = if lyrics.trim().ends_with(END_MARKER) {
        lyrics.to_string()
    } else {
        format!("{}\n{}", lyrics.trim(), END_MARKER)
    };

    let formatted = format!("{}\n\n{}", directions.intro(), body);

    Ok(create_generation_request(title, directions.tags, &formatted))
}
