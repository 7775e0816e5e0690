//! Types for the download orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::locator::LocatorError;
use crate::resolver::ResolveError;

/// Identifier of a submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated request. Immutable once accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub id: RequestId,
    pub url: String,
    /// Directory the file is written to. Exists when the request is accepted.
    pub destination: PathBuf,
    pub submitted_at: DateTime<Utc>,
}

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Classifying,
    Resolving,
    Searching,
    Downloading,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Result attached to a progress event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum Outcome {
    None,
    Success(String),
    Failure(String),
}

/// Progress notification published by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub request_id: RequestId,
    pub phase: Phase,
    /// Overall progress in `[0, 1]`, absent when unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fraction: Option<f32>,
    /// Short human readable status line.
    pub status: String,
    pub outcome: Outcome,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn progress(
        request_id: RequestId,
        phase: Phase,
        fraction: Option<f32>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            request_id,
            phase,
            fraction,
            status: status.into(),
            outcome: Outcome::None,
            timestamp: Utc::now(),
        }
    }

    pub fn succeeded(request_id: RequestId, message: impl Into<String>) -> Self {
        Self {
            request_id,
            phase: Phase::Succeeded,
            fraction: Some(1.0),
            status: "Download completed!".to_string(),
            outcome: Outcome::Success(message.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn failed(request_id: RequestId, error: impl Into<String>) -> Self {
        Self {
            request_id,
            phase: Phase::Failed,
            fraction: Some(0.0),
            status: "Download failed!".to_string(),
            outcome: Outcome::Failure(error.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}

/// Input rejected before the pipeline starts.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Please enter a Spotify URL")]
    EmptyUrl,

    #[error("Invalid Spotify URL: {0}")]
    InvalidUrl(String),

    #[error("Could not create directory {path}: {reason}")]
    Destination { path: PathBuf, reason: String },
}

/// Why a submission was not accepted.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Another request is in flight.
    #[error("A download is already in progress")]
    Busy,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Failure inside the running pipeline. Reported as a `Failed` event.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Locator(#[from] LocatorError),

    /// The worker task panicked or was cancelled.
    #[error("Download stopped unexpectedly: {0}")]
    Aborted(String),
}

/// Snapshot of the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorStatus {
    /// Whether a request is in flight.
    pub busy: bool,
    /// Most recent event, if any request was ever submitted.
    pub last_event: Option<ProgressEvent>,
}
