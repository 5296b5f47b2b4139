//! Configuration resolution for chirp-proxy
//!
//! **Priority:** CLI flag / environment variable → TOML file → compiled default

use chirp_common::config::{
    self, load_toml_config, resolve_base_url, resolve_bind_address, resolve_tasks_dir,
    resolve_worker_count, DEFAULT_POLL_DELAY_MS, DEFAULT_POLL_MAX_RETRIES,
};
use chirp_common::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "chirp-proxy", version, about = "Music generation API proxy with async task tracking")]
pub struct Cli {
    /// Upstream generation API base URL
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Directory holding task records
    #[arg(long, env = "TASKS_DIR")]
    pub tasks_dir: Option<PathBuf>,

    /// Listen address (host:port)
    #[arg(long, env = "CHIRP_PROXY_BIND")]
    pub bind: Option<String>,

    /// Number of background generation workers
    #[arg(long, env = "CHIRP_PROXY_WORKERS")]
    pub workers: Option<usize>,

    /// TOML config file (default: platform config dir)
    #[arg(long, env = "CHIRP_PROXY_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyConfig {
    pub base_url: String,
    pub tasks_dir: PathBuf,
    pub bind: String,
    pub workers: usize,
    pub poll_max_retries: u32,
    pub poll_delay: Duration,
}

impl ProxyConfig {
    /// Resolve configuration from parsed CLI arguments and the TOML file
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let toml = load_toml_config(cli.config.as_deref())?;

        let resolved = Self {
            base_url: resolve_base_url(cli.base_url.as_deref(), &toml)?,
            tasks_dir: resolve_tasks_dir(cli.tasks_dir.as_deref(), &toml),
            bind: resolve_bind_address(cli.bind.as_deref(), &toml),
            workers: resolve_worker_count(cli.workers, &toml),
            poll_max_retries: toml.polling.max_retries.unwrap_or(DEFAULT_POLL_MAX_RETRIES),
            poll_delay: Duration::from_millis(toml.polling.delay_ms.unwrap_or(DEFAULT_POLL_DELAY_MS)),
        };

        info!(
            base_url = %resolved.base_url,
            tasks_dir = %resolved.tasks_dir.display(),
            bind = %resolved.bind,
            workers = resolved.workers,
            "Configuration resolved"
        );

        Ok(resolved)
    }

    /// Create the task directory if missing
    pub fn ensure_tasks_dir(&self) -> Result<()> {
        config::ensure_directory(&self.tasks_dir)
    }
}
