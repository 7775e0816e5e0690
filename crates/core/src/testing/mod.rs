//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service traits,
//! so the whole pipeline can be exercised without network access or yt-dlp.
//!
//! # Example
//!
//! ```rust,ignore
//! use tunefetch_core::testing::{fixtures, MockCatalog, MockLocator};
//!
//! let catalog = MockCatalog::new();
//! let locator = MockLocator::new();
//!
//! // Configure mock responses
//! catalog.add_track(fixtures::track(fixtures::TRACK_ID, "Song", &["Artist"])).await;
//! locator.set_results(vec![fixtures::candidate("Song", "Artist")]).await;
//!
//! // Use in DownloadOrchestrator / AppState...
//! ```

mod mock_catalog;
mod mock_locator;

pub use mock_catalog::{MockCatalog, RecordedCatalogQuery};
pub use mock_locator::{MockLocator, RecordedFetch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{CatalogAlbum, CatalogArtist, CatalogEpisode, CatalogShow, CatalogTrack};
    use crate::locator::{AudioProvider, SongCandidate};

    pub const TRACK_ID: &str = "6rqhFgbbKwnb9MLmUQDhG6";
    pub const TRACK_URL: &str = "https://open.spotify.com/track/6rqhFgbbKwnb9MLmUQDhG6";
    pub const EPISODE_ID: &str = "512ojhOuo1ktJprKbVcKyQ";
    pub const EPISODE_URL: &str = "https://open.spotify.com/episode/512ojhOuo1ktJprKbVcKyQ";
    pub const PLAYLIST_URL: &str = "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M";

    /// Create a test track.
    pub fn track(id: &str, name: &str, artists: &[&str]) -> CatalogTrack {
        CatalogTrack {
            id: id.to_string(),
            name: name.to_string(),
            artists: artists
                .iter()
                .map(|a| CatalogArtist {
                    name: a.to_string(),
                })
                .collect(),
            album: Some(CatalogAlbum {
                name: format!("{} (Single)", name),
            }),
            duration_ms: Some(215_000),
        }
    }

    /// Create a test podcast episode.
    pub fn episode(id: &str, show: &str, name: &str) -> CatalogEpisode {
        CatalogEpisode {
            id: id.to_string(),
            name: name.to_string(),
            show: CatalogShow {
                name: show.to_string(),
            },
            duration_ms: Some(3_600_000),
        }
    }

    /// Create a test search candidate.
    pub fn candidate(name: &str, artist: &str) -> SongCandidate {
        SongCandidate {
            name: name.to_string(),
            artist: artist.to_string(),
            url: format!(
                "https://music.youtube.com/watch?v={}",
                name.to_lowercase().replace(' ', "-")
            ),
            duration_secs: Some(215.0),
            provider: AudioProvider::YoutubeMusic,
        }
    }
}
