//! Metadata resolution.
//!
//! Turns a classified [`ContentReference`] into the [`SearchQuery`] handed to
//! the audio locator. Direct references go through the metadata catalog
//! (with retry); unresolved input is passed through verbatim.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::MetadataCatalog;
use crate::content::{ContentKind, ContentReference, SearchQuery};
use crate::retry::{with_retry, RetryPolicy};

/// Default delay after a successful catalog lookup.
pub const DEFAULT_PACING: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The catalog has no record for this id.
    #[error("Could not find {kind} with ID: {id}")]
    NotFound { kind: ContentKind, id: String },

    /// Every attempt failed.
    #[error("Metadata lookup failed: {0}")]
    Transient(String),
}

/// Resolves content references into search queries.
pub struct MetadataResolver {
    catalog: Arc<dyn MetadataCatalog>,
    retry: RetryPolicy,
    pacing: Duration,
}

impl MetadataResolver {
    pub fn new(catalog: Arc<dyn MetadataCatalog>) -> Self {
        Self {
            catalog,
            retry: RetryPolicy::default(),
            pacing: DEFAULT_PACING,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Delay applied after each successful catalog lookup.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub async fn resolve(&self, reference: &ContentReference) -> Result<SearchQuery, ResolveError> {
        let query = match reference.kind {
            ContentKind::Unresolved => {
                debug!(input = %reference.id, "Passing unresolved input to search verbatim");
                return Ok(SearchQuery::new(reference.id.clone()));
            }
            ContentKind::Track => {
                let track = with_retry(&self.retry, || self.catalog.get_track(&reference.id))
                    .await
                    .map_err(|e| ResolveError::Transient(e.to_string()))?
                    .ok_or_else(|| not_found(reference))?;
                SearchQuery::for_track(&track.name, &track.artist_names())
            }
            ContentKind::Episode => {
                let episode = with_retry(&self.retry, || self.catalog.get_episode(&reference.id))
                    .await
                    .map_err(|e| ResolveError::Transient(e.to_string()))?
                    .ok_or_else(|| not_found(reference))?;
                SearchQuery::for_episode(&episode.show.name, &episode.name)
            }
        };

        info!(
            catalog = self.catalog.name(),
            kind = %reference.kind,
            id = %reference.id,
            query = %query,
            "Resolved metadata"
        );

        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }

        Ok(query)
    }
}

fn not_found(reference: &ContentReference) -> ResolveError {
    ResolveError::NotFound {
        kind: reference.kind,
        id: reference.id.clone(),
    }
}
