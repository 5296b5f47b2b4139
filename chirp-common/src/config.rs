//! Configuration loading and value resolution
//!
//! Values are resolved in priority order:
//! 1. Command-line argument or environment variable (handled by the caller's CLI parser)
//! 2. TOML config file
//! 3. Compiled default (fallback)
//!
//! A missing TOML file never aborts startup: it is logged and defaults apply.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default directory for task records, relative to the working directory
pub const DEFAULT_TASKS_DIR: &str = "tasks";

/// Default HTTP listen address
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";

/// Default number of generation workers
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Default maximum clip lookups while waiting for audio
pub const DEFAULT_POLL_MAX_RETRIES: u32 = 60;

/// Default delay between clip lookups (milliseconds)
pub const DEFAULT_POLL_DELAY_MS: u64 = 2000;

/// Contents of the optional TOML config file
///
/// Every field is optional; absent fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Upstream generation API base URL
    pub base_url: Option<String>,
    /// Directory holding one JSON record per task
    pub tasks_dir: Option<PathBuf>,
    /// HTTP listen address (host:port)
    pub bind: Option<String>,
    /// Number of background generation workers
    pub workers: Option<usize>,
    /// Clip polling settings
    pub polling: PollingConfig,
}

/// `[polling]` table of the TOML config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub max_retries: Option<u32>,
    pub delay_ms: Option<u64>,
}

/// Default config file location for the platform
///
/// `~/.config/chirp-proxy/config.toml` on Linux, the platform equivalent elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chirp-proxy").join("config.toml"))
}

/// Load the TOML config
///
/// An explicitly requested file must exist and parse. When no path is given the
/// platform default is tried, and a missing file yields `TomlConfig::default()`.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        return read_toml_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => read_toml_config(&path),
        Some(path) => {
            warn!(path = %path.display(), "No config file found, using defaults");
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Read and parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    info!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Resolve the task record directory
pub fn resolve_tasks_dir(cli_arg: Option<&Path>, toml: &TomlConfig) -> PathBuf {
    cli_arg
        .map(Path::to_path_buf)
        .or_else(|| toml.tasks_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TASKS_DIR))
}

/// Resolve the upstream base URL
///
/// There is no compiled default: an unset or blank URL is a configuration error.
/// A trailing `/` is removed so paths can be appended directly.
pub fn resolve_base_url(cli_arg: Option<&str>, toml: &TomlConfig) -> Result<String> {
    let url = cli_arg
        .map(str::to_string)
        .or_else(|| toml.base_url.clone())
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| {
            Error::Config(
                "Upstream base URL not configured. Set one of:\n\
                 1. Command line: --base-url https://example.com\n\
                 2. Environment: BASE_URL=https://example.com\n\
                 3. TOML config: base_url = \"https://example.com\""
                    .to_string(),
            )
        })?;

    Ok(url.trim().trim_end_matches('/').to_string())
}

/// Resolve the HTTP listen address
pub fn resolve_bind_address(cli_arg: Option<&str>, toml: &TomlConfig) -> String {
    cli_arg
        .map(str::to_string)
        .or_else(|| toml.bind.clone())
        .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
}

/// Resolve the worker count (never less than one)
pub fn resolve_worker_count(cli_arg: Option<usize>, toml: &TomlConfig) -> usize {
    cli_arg
        .or(toml.workers)
        .unwrap_or(DEFAULT_WORKER_COUNT)
        .max(1)
}

/// Create a directory (and parents) if missing
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        info!(path = %path.display(), "Created directory");
    }
    Ok(())
}
