//! Download orchestrator.
//!
//! Drives one request at a time through
//! `Classifying -> Resolving -> Searching -> Downloading -> Succeeded | Failed`
//! on a background task and publishes a [`ProgressEvent`] for every step.
//! A second submission while a request is running is rejected, not queued.

mod config;
mod runner;
mod types;

pub use config::PipelineConfig;
pub use runner::DownloadOrchestrator;
pub use types::{
    DownloadRequest, Outcome, OrchestratorStatus, Phase, PipelineError, ProgressEvent, RequestId,
    SubmitError, ValidationError,
};
