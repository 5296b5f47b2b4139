//! Data models for chirp-proxy

pub mod generation;
pub mod task_record;

pub use generation::{
    ConcatParam, CustomModeGenerateParam, DescriptionModeGenerateParam, GenerateLyricsParam,
    ServiceResponse, DEFAULT_MODEL_VERSION,
};
pub use task_record::{FailureKind, TaskFailure, TaskRecord, TaskStatus};
