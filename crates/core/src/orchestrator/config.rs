//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Configuration for the download pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Where files go when a request names no destination.
    /// Falls back to the directory the process was started in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_destination: Option<PathBuf>,

    /// Pause after each successful metadata lookup (milliseconds).
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Total metadata lookup attempts, including the first.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Backoff before the first retry (milliseconds); doubles each retry.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

fn default_pacing_ms() -> u64 {
    1000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_destination: None,
            pacing_ms: default_pacing_ms(),
            retry_attempts: default_retry_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

impl PipelineConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}
