//! Service modules behind the HTTP API
//!
//! - `upstream_client`: calls into the third-party generation API
//! - `audio_poller`: waits for clip audio to become available
//! - `task_orchestrator`: background generation worker pool

pub mod audio_poller;
pub mod task_orchestrator;
pub mod upstream_client;

pub use audio_poller::{AudioPoller, PollError};
pub use task_orchestrator::{GenerationJob, TaskOrchestrator};
pub use upstream_client::{GenerationApi, UpstreamClient, UpstreamConfig, UpstreamError};
