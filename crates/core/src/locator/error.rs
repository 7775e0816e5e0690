//! Error types for the locator module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while searching for or fetching audio.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Downloader binary not found.
    #[error("yt-dlp not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// The search command failed.
    #[error("Search failed: {reason}{}", stderr_suffix(.stderr))]
    SearchFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// The download command failed.
    #[error("Download failed: {reason}{}", stderr_suffix(.stderr))]
    DownloadFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// The tool did not finish in time.
    #[error("Operation timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The search returned nothing usable.
    #[error("No content found for this URL")]
    NoResults,

    /// I/O error while running the tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The tool's own explanation, which yt-dlp prints as the last stderr line.
fn stderr_suffix(stderr: &Option<String>) -> String {
    stderr
        .as_deref()
        .and_then(|s| s.lines().rev().map(str::trim).find(|l| !l.is_empty()))
        .map(|line| format!(" ({})", line))
        .unwrap_or_default()
}

impl LocatorError {
    /// Creates a new search failed error with stderr output.
    pub fn search_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::SearchFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new download failed error with stderr output.
    pub fn download_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::DownloadFailed {
            reason: reason.into(),
            stderr,
        }
    }
}
