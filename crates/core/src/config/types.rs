use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::catalog::SpotifyConfig;
use crate::locator::{AudioFormat, AudioProvider, DownloaderConfig};
use crate::orchestrator::PipelineConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub downloader: DownloaderConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}

fn default_port() -> u16 {
    8080
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub spotify: SanitizedSpotifyConfig,
    pub downloader: SanitizedDownloaderConfig,
    pub pipeline: PipelineConfig,
}

/// Sanitized Spotify config (client secret hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSpotifyConfig {
    pub client_id: String,
    pub client_secret_configured: bool,
    pub market: String,
}

/// Downloader settings that are safe to show
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedDownloaderConfig {
    pub ytdlp_path: PathBuf,
    pub format: AudioFormat,
    pub provider: AudioProvider,
    pub filter_results: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            spotify: SanitizedSpotifyConfig {
                client_id: config.spotify.client_id.clone(),
                client_secret_configured: !config.spotify.client_secret.is_empty(),
                market: config.spotify.market.clone(),
            },
            downloader: SanitizedDownloaderConfig {
                ytdlp_path: config.downloader.ytdlp_path.clone(),
                format: config.downloader.format,
                provider: config.downloader.provider,
                filter_results: config.downloader.filter_results,
            },
            pipeline: config.pipeline.clone(),
        }
    }
}
