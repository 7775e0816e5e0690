//! Types for the locator module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Output audio format passed to `--audio-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    #[default]
    Mp3,
    M4a,
    Opus,
    Flac,
    Vorbis,
    Wav,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Opus => "opus",
            Self::Flac => "flac",
            Self::Vorbis => "vorbis",
            Self::Wav => "wav",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where audio is searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioProvider {
    Youtube,
    #[default]
    YoutubeMusic,
}

impl AudioProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::YoutubeMusic => "youtube_music",
        }
    }
}

impl fmt::Display for AudioProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search hit that can be fetched.
///
/// Produced by [`AudioLocator::search`](super::AudioLocator::search) and handed
/// back to `fetch` unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongCandidate {
    /// Title of the hit.
    pub name: String,
    /// Artist or uploader.
    pub artist: String,
    /// Page URL the downloader understands.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    pub provider: AudioProvider,
}

impl SongCandidate {
    /// `"<artist> - <name>"`, as shown to the user.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.name)
    }
}

/// A finished download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadOutcome {
    pub candidate: SongCandidate,
    /// Final path of the audio file.
    pub path: PathBuf,
}
