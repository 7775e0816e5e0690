//! Configuration for the locator module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::types::{AudioFormat, AudioProvider};

/// Configuration for the yt-dlp based locator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloaderConfig {
    /// Path to the yt-dlp binary.
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,

    /// Output audio format.
    #[serde(default)]
    pub format: AudioFormat,

    /// Where to search for audio.
    #[serde(default)]
    pub provider: AudioProvider,

    /// Drop live streams and entries without a URL before picking one.
    #[serde(default = "default_filter_results")]
    pub filter_results: bool,

    /// Number of search results to request.
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Timeout for a single yt-dlp invocation in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_filter_results() -> bool {
    true
}

fn default_search_limit() -> u32 {
    5
}

fn default_timeout() -> u64 {
    600 // 10 minutes
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: default_ytdlp_path(),
            format: AudioFormat::default(),
            provider: AudioProvider::default(),
            filter_results: default_filter_results(),
            search_limit: default_search_limit(),
            timeout_secs: default_timeout(),
        }
    }
}

impl DownloaderConfig {
    /// Sets the output format.
    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
