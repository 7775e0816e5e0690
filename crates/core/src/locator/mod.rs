//! Audio search and download.
//!
//! This module provides the `AudioLocator` trait and a yt-dlp backed
//! implementation. yt-dlp does both the provider search and the
//! download + conversion (through ffmpeg), so nothing here touches audio
//! data directly.
//!
//! # Example
//!
//! ```ignore
//! use tunefetch_core::locator::{AudioLocator, DownloaderConfig, YtDlpLocator, select_candidate};
//!
//! let locator = YtDlpLocator::new(DownloaderConfig::default());
//! locator.validate().await?;
//!
//! let candidates = locator.search(&SearchQuery::new("Song - Artist")).await?;
//! let candidate = select_candidate(candidates)?;
//! let path = locator.fetch(&candidate, Path::new("/music")).await?;
//! ```

mod config;
mod error;
mod traits;
mod types;
mod ytdlp;

pub use config::DownloaderConfig;
pub use error::LocatorError;
pub use traits::{select_candidate, AudioLocator};
pub use types::{AudioFormat, AudioProvider, DownloadOutcome, SongCandidate};
pub use ytdlp::YtDlpLocator;
