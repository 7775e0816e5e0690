//! Metadata catalog integration.
//!
//! A catalog turns a track or episode id into the names needed to build
//! a search query. The only production backend is the Spotify Web API.

mod spotify;
mod types;

pub use spotify::{SpotifyClient, SpotifyConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to a metadata catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Credentials were rejected or the access token expired.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing credentials, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Read-only access to track and episode metadata.
///
/// Lookups return `Ok(None)` when the catalog has no record for the id, so
/// callers can tell a missing item apart from a failed request.
#[async_trait]
pub trait MetadataCatalog: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Obtain (or refresh) credentials. Called once at startup.
    async fn authenticate(&self) -> Result<(), CatalogError>;

    /// Look up a track by id.
    async fn get_track(&self, id: &str) -> Result<Option<CatalogTrack>, CatalogError>;

    /// Look up a podcast episode by id.
    async fn get_episode(&self, id: &str) -> Result<Option<CatalogEpisode>, CatalogError>;
}
