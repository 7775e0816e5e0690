//! yt-dlp based locator implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use super::config::DownloaderConfig;
use super::error::LocatorError;
use super::traits::AudioLocator;
use super::types::{AudioProvider, SongCandidate};
use crate::content::SearchQuery;

const YOUTUBE_MUSIC_SEARCH_URL: &str = "https://music.youtube.com/search?q=";

/// Output template; yt-dlp fills in title and extension.
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// One line of `--dump-json --flat-playlist` output.
#[derive(Debug, Deserialize)]
struct SearchEntry {
    id: Option<String>,
    title: Option<String>,
    url: Option<String>,
    webpage_url: Option<String>,
    channel: Option<String>,
    uploader: Option<String>,
    artists: Option<Vec<String>>,
    duration: Option<f64>,
    live_status: Option<String>,
    is_live: Option<bool>,
}

impl SearchEntry {
    fn is_live(&self) -> bool {
        self.is_live.unwrap_or(false)
            || matches!(
                self.live_status.as_deref(),
                Some("is_live") | Some("is_upcoming")
            )
    }

    fn page_url(&self, provider: AudioProvider) -> Option<String> {
        if let Some(url) = self.webpage_url.as_ref().or(self.url.as_ref()) {
            if !url.trim().is_empty() {
                return Some(url.clone());
            }
        }
        let id = self.id.as_deref().filter(|id| !id.is_empty())?;
        Some(match provider {
            AudioProvider::Youtube => format!("https://www.youtube.com/watch?v={}", id),
            AudioProvider::YoutubeMusic => format!("https://music.youtube.com/watch?v={}", id),
        })
    }

    fn into_candidate(self, provider: AudioProvider) -> Option<SongCandidate> {
        let url = self.page_url(provider)?;

        let artist = self
            .artists
            .filter(|artists| !artists.is_empty())
            .map(|artists| artists.join(", "))
            .or(self.channel)
            .or(self.uploader)
            .unwrap_or_else(|| "Unknown Artist".to_string());

        Some(SongCandidate {
            name: self.title.unwrap_or_else(|| "Unknown".to_string()),
            artist,
            url,
            duration_secs: self.duration,
            provider,
        })
    }
}

/// Locator that shells out to yt-dlp for search and download.
pub struct YtDlpLocator {
    config: DownloaderConfig,
}

impl YtDlpLocator {
    /// Creates a new locator with the given configuration.
    pub fn new(config: DownloaderConfig) -> Self {
        Self { config }
    }

    /// Creates a locator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(DownloaderConfig::default())
    }

    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Builds yt-dlp arguments for a search.
    fn build_search_args(&self, query: &SearchQuery) -> Vec<String> {
        let limit = self.config.search_limit.max(1);
        let mut args = vec![
            "--dump-json".to_string(),
            "--flat-playlist".to_string(),
            "--no-download".to_string(),
            "--no-warnings".to_string(),
            "--ignore-errors".to_string(),
        ];

        match self.config.provider {
            AudioProvider::Youtube => {
                args.push(format!("ytsearch{}:{}", limit, query.as_str()));
            }
            AudioProvider::YoutubeMusic => {
                args.extend(["--playlist-end".to_string(), limit.to_string()]);
                args.push(format!(
                    "{}{}#songs",
                    YOUTUBE_MUSIC_SEARCH_URL,
                    urlencoding::encode(query.as_str())
                ));
            }
        }

        args
    }

    /// Builds yt-dlp arguments for download + conversion.
    fn build_fetch_args(&self, candidate: &SongCandidate, destination: &Path) -> Vec<String> {
        vec![
            "-x".to_string(),
            "--audio-format".to_string(),
            self.config.format.as_str().to_string(),
            "--audio-quality".to_string(),
            "0".to_string(),
            "--no-playlist".to_string(),
            "--no-progress".to_string(),
            "-o".to_string(),
            destination.join(OUTPUT_TEMPLATE).to_string_lossy().to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            candidate.url.clone(),
        ]
    }

    /// Parses search output (one JSON object per line) into candidates.
    fn parse_search_output(&self, stdout: &str) -> Vec<SongCandidate> {
        let provider = self.config.provider;
        stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<SearchEntry>(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(error = %e, "Skipping unparseable yt-dlp search line");
                    None
                }
            })
            .filter(|entry| !(self.config.filter_results && entry.is_live()))
            .filter_map(|entry| entry.into_candidate(provider))
            .filter(|candidate| !self.config.filter_results || is_http_url(&candidate.url))
            .collect()
    }

    /// Runs yt-dlp with the configured timeout.
    async fn run(&self, args: &[String]) -> Result<Output, LocatorError> {
        let child = Command::new(&self.config.ytdlp_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.map_spawn_error(e))?;

        let timeout_secs = self.config.timeout_secs;
        match timeout(Duration::from_secs(timeout_secs), child.wait_with_output()).await {
            Ok(output) => Ok(output?),
            Err(_) => Err(LocatorError::Timeout { timeout_secs }),
        }
    }

    fn map_spawn_error(&self, e: std::io::Error) -> LocatorError {
        if e.kind() == std::io::ErrorKind::NotFound {
            LocatorError::ToolNotFound {
                path: self.config.ytdlp_path.clone(),
            }
        } else {
            LocatorError::Io(e)
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn stderr_text(output: &Output) -> Option<String> {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    (!stderr.is_empty()).then_some(stderr)
}

/// Last non-empty stdout line, which is what `--print after_move:filepath` writes.
fn printed_path(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .map(PathBuf::from)
}

#[async_trait]
impl AudioLocator for YtDlpLocator {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn validate(&self) -> Result<(), LocatorError> {
        let output = Command::new(&self.config.ytdlp_path)
            .arg("--version")
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(LocatorError::search_failed(
                "yt-dlp --version failed",
                stderr_text(&output),
            ));
        }

        info!(
            version = %String::from_utf8_lossy(&output.stdout).trim(),
            "yt-dlp available"
        );
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SongCandidate>, LocatorError> {
        debug!(query = %query, provider = %self.config.provider, "yt-dlp search");

        let args = self.build_search_args(query);
        let output = self.run(&args).await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let candidates = self.parse_search_output(&stdout);

        // --ignore-errors makes yt-dlp exit non-zero on partial failures; only
        // treat it as fatal when nothing usable came back.
        if !output.status.success() && candidates.is_empty() {
            let stderr = stderr_text(&output);
            if stdout.trim().is_empty() && stderr.is_some() {
                return Err(LocatorError::search_failed(
                    format!("yt-dlp exited with {}", output.status),
                    stderr,
                ));
            }
        }

        debug!(results = candidates.len(), "yt-dlp search finished");
        Ok(candidates)
    }

    async fn fetch(
        &self,
        candidate: &SongCandidate,
        destination: &Path,
    ) -> Result<PathBuf, LocatorError> {
        info!(
            url = %candidate.url,
            destination = %destination.display(),
            format = %self.config.format,
            "Starting download"
        );

        let args = self.build_fetch_args(candidate, destination);
        let output = self.run(&args).await?;

        if !output.status.success() {
            let stderr = stderr_text(&output);
            warn!(status = %output.status, stderr = ?stderr, "yt-dlp download failed");
            return Err(LocatorError::download_failed(
                format!("yt-dlp exited with {}", output.status),
                stderr,
            ));
        }

        let path = printed_path(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            LocatorError::download_failed("yt-dlp did not report an output file", None)
        })?;

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(LocatorError::download_failed(
                format!("reported output file does not exist: {}", path.display()),
                None,
            ));
        }

        info!(path = %path.display(), "Download finished");
        Ok(path)
    }
}
