//! Mock audio locator for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

use crate::content::SearchQuery;
use crate::locator::{AudioLocator, LocatorError, SongCandidate};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    pub candidate: SongCandidate,
    pub destination: PathBuf,
}

/// Mock implementation of the AudioLocator trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search results
/// - Write a small placeholder file on fetch
/// - Track searches and fetches for assertions
/// - Simulate failures, or hold fetches until released
///
/// # Example
///
/// ```rust,ignore
/// use tunefetch_core::testing::{MockLocator, fixtures};
///
/// let locator = MockLocator::new();
/// locator.set_results(vec![fixtures::candidate("Song", "Artist")]).await;
///
/// // Block the next fetch until the test says so
/// let gate = locator.hold_fetches().await;
/// // ... submit, observe Downloading ...
/// gate.notify_one();
/// ```
#[derive(Debug, Default)]
pub struct MockLocator {
    results: Arc<RwLock<Vec<SongCandidate>>>,
    searches: Arc<RwLock<Vec<SearchQuery>>>,
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    next_search_error: Arc<RwLock<Option<LocatorError>>>,
    next_fetch_error: Arc<RwLock<Option<LocatorError>>>,
    fetch_gate: Arc<RwLock<Option<Arc<Notify>>>>,
}

impl MockLocator {
    /// Create a mock locator that finds nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidates every search returns.
    pub async fn set_results(&self, results: Vec<SongCandidate>) {
        *self.results.write().await = results;
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_search_error(&self, error: LocatorError) {
        *self.next_search_error.write().await = Some(error);
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_fetch_error(&self, error: LocatorError) {
        *self.next_fetch_error.write().await = Some(error);
    }

    /// Make fetches wait until the returned handle is notified.
    ///
    /// Each `notify_one` releases one fetch.
    pub async fn hold_fetches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.fetch_gate.write().await = Some(gate.clone());
        gate
    }

    /// Get all recorded search queries.
    pub async fn recorded_searches(&self) -> Vec<SearchQuery> {
        self.searches.read().await.clone()
    }

    /// Get all recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }
}

#[async_trait]
impl AudioLocator for MockLocator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn validate(&self) -> Result<(), LocatorError> {
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SongCandidate>, LocatorError> {
        self.searches.write().await.push(query.clone());

        if let Some(err) = self.next_search_error.write().await.take() {
            return Err(err);
        }

        Ok(self.results.read().await.clone())
    }

    async fn fetch(
        &self,
        candidate: &SongCandidate,
        destination: &Path,
    ) -> Result<PathBuf, LocatorError> {
        self.fetches.write().await.push(RecordedFetch {
            candidate: candidate.clone(),
            destination: destination.to_path_buf(),
        });

        let gate = self.fetch_gate.read().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(err) = self.next_fetch_error.write().await.take() {
            return Err(err);
        }

        let path = destination.join(format!("{}.mp3", candidate.name));
        tokio::fs::write(&path, b"mock audio").await?;
        Ok(path)
    }
}
