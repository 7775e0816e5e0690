//! Types for metadata catalog responses.
//!
//! Field names follow the Spotify Web API objects so responses deserialize
//! directly; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// A track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogTrack {
    pub id: String,
    /// Track title.
    pub name: String,
    /// Credited artists, in catalog order.
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<CatalogAlbum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl CatalogTrack {
    /// Artist names in catalog order.
    pub fn artist_names(&self) -> Vec<&str> {
        self.artists.iter().map(|a| a.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogAlbum {
    pub name: String,
}

/// A podcast episode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEpisode {
    pub id: String,
    /// Episode title.
    pub name: String,
    /// The show this episode belongs to.
    pub show: CatalogShow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogShow {
    pub name: String,
}
