//! Trait definitions for the locator module.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::error::LocatorError;
use super::types::SongCandidate;
use crate::content::SearchQuery;

/// Finds audio matching a query and downloads it.
#[async_trait]
pub trait AudioLocator: Send + Sync {
    /// Returns the name of this locator implementation.
    fn name(&self) -> &str;

    /// Validates that the locator is properly configured and ready.
    async fn validate(&self) -> Result<(), LocatorError>;

    /// Search for candidates, best match first. An empty list is not an error.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SongCandidate>, LocatorError>;

    /// Download and convert `candidate` into `destination`.
    ///
    /// Returns the path of the written file.
    async fn fetch(
        &self,
        candidate: &SongCandidate,
        destination: &Path,
    ) -> Result<PathBuf, LocatorError>;
}

/// Pick the candidate to download: the first one.
pub fn select_candidate(candidates: Vec<SongCandidate>) -> Result<SongCandidate, LocatorError> {
    candidates.into_iter().next().ok_or(LocatorError::NoResults)
}
