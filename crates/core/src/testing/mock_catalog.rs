//! Mock metadata catalog for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{CatalogEpisode, CatalogError, CatalogTrack, MetadataCatalog};

/// A recorded catalog call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCatalogQuery {
    Authenticate,
    GetTrack { id: String },
    GetEpisode { id: String },
}

/// Mock implementation of the MetadataCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configured tracks and episodes (unknown ids are `Ok(None)`)
/// - Track calls for assertions
/// - Simulate transient failures and rejected credentials
///
/// # Example
///
/// ```rust,ignore
/// use tunefetch_core::testing::{MockCatalog, fixtures};
///
/// let catalog = MockCatalog::new();
/// catalog.add_track(fixtures::track("t1", "Song", &["Artist"])).await;
/// catalog.fail_times(2).await;
///
/// // First two lookups fail, the third returns the track.
/// ```
#[derive(Debug, Default)]
pub struct MockCatalog {
    tracks: Arc<RwLock<HashMap<String, CatalogTrack>>>,
    episodes: Arc<RwLock<HashMap<String, CatalogEpisode>>>,
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// Errors returned by the next lookups, in order.
    pending_errors: Arc<RwLock<VecDeque<CatalogError>>>,
    reject_credentials: Arc<RwLock<bool>>,
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_track(&self, track: CatalogTrack) {
        self.tracks.write().await.insert(track.id.clone(), track);
    }

    pub async fn add_episode(&self, episode: CatalogEpisode) {
        self.episodes
            .write()
            .await
            .insert(episode.id.clone(), episode);
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        self.pending_errors.write().await.push_back(error);
    }

    /// Make the next `n` lookups fail with a rate limit error.
    pub async fn fail_times(&self, n: usize) {
        let mut errors = self.pending_errors.write().await;
        for _ in 0..n {
            errors.push_back(CatalogError::RateLimitExceeded);
        }
    }

    /// Make `authenticate` fail.
    pub async fn reject_credentials(&self) {
        *self.reject_credentials.write().await = true;
    }

    /// Get all recorded calls.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Number of track/episode lookups, failed ones included.
    pub async fn call_count(&self) -> usize {
        self.queries
            .read()
            .await
            .iter()
            .filter(|q| !matches!(q, RecordedCatalogQuery::Authenticate))
            .count()
    }

    async fn record(&self, query: RecordedCatalogQuery) {
        self.queries.write().await.push(query);
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.pending_errors.write().await.pop_front()
    }
}

#[async_trait]
impl MetadataCatalog for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    async fn authenticate(&self) -> Result<(), CatalogError> {
        self.record(RecordedCatalogQuery::Authenticate).await;
        if *self.reject_credentials.read().await {
            return Err(CatalogError::Unauthorized(
                "mock credentials rejected".to_string(),
            ));
        }
        Ok(())
    }

    async fn get_track(&self, id: &str) -> Result<Option<CatalogTrack>, CatalogError> {
        self.record(RecordedCatalogQuery::GetTrack { id: id.to_string() })
            .await;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(self.tracks.read().await.get(id).cloned())
    }

    async fn get_episode(&self, id: &str) -> Result<Option<CatalogEpisode>, CatalogError> {
        self.record(RecordedCatalogQuery::GetEpisode { id: id.to_string() })
            .await;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(self.episodes.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let catalog = MockCatalog::new();
        assert!(catalog.get_track("nope").await.unwrap().is_none());
        assert!(catalog.get_episode("nope").await.unwrap().is_none());
        assert_eq!(catalog.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_errors_are_consumed_in_order() {
        let catalog = MockCatalog::new();
        catalog.add_track(fixtures::track("t1", "Song", &["A"])).await;
        catalog
            .set_next_error(CatalogError::Unauthorized("x".to_string()))
            .await;
        catalog.fail_times(1).await;

        assert!(matches!(
            catalog.get_track("t1").await,
            Err(CatalogError::Unauthorized(_))
        ));
        assert!(matches!(
            catalog.get_track("t1").await,
            Err(CatalogError::RateLimitExceeded)
        ));
        assert_eq!(catalog.get_track("t1").await.unwrap().unwrap().name, "Song");
    }

    #[tokio::test]
    async fn test_reject_credentials() {
        let catalog = MockCatalog::new();
        assert!(catalog.authenticate().await.is_ok());
        catalog.reject_credentials().await;
        assert!(catalog.authenticate().await.is_err());
        assert_eq!(catalog.call_count().await, 0);
        assert_eq!(
            catalog.recorded_queries().await,
            vec![
                RecordedCatalogQuery::Authenticate,
                RecordedCatalogQuery::Authenticate
            ]
        );
    }
}
