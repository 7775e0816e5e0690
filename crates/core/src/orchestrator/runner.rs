//! Download orchestrator implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::{broadcast, Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, error, info, warn};

use super::config::PipelineConfig;
use super::types::{
    DownloadRequest, OrchestratorStatus, Phase, PipelineError, ProgressEvent, RequestId,
    SubmitError, ValidationError,
};
use crate::catalog::MetadataCatalog;
use crate::content::UrlClassifier;
use crate::locator::{select_candidate, AudioLocator, DownloadOutcome};
use crate::metrics::{PIPELINE_DURATION, REQUESTS_TOTAL, REQUEST_ACTIVE};
use crate::resolver::MetadataResolver;

/// Buffered events per subscriber before it starts lagging.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Publishes events and remembers the last one for status queries.
#[derive(Clone)]
struct EventPublisher {
    tx: broadcast::Sender<ProgressEvent>,
    last_event: Arc<RwLock<Option<ProgressEvent>>>,
}

impl EventPublisher {
    async fn publish(&self, event: ProgressEvent) {
        log_event(&event);
        let mut last_event = self.last_event.write().await;
        *last_event = Some(event.clone());
        // No subscribers is fine.
        let _ = self.tx.send(event);
    }

    /// Publish the last event of a request and free `slot`.
    ///
    /// The slot is released while `last_event` is still locked, so a request
    /// accepted right after cannot publish ahead of this event.
    async fn publish_terminal(&self, event: ProgressEvent, slot: OwnedMutexGuard<()>) {
        log_event(&event);
        let mut last_event = self.last_event.write().await;
        *last_event = Some(event.clone());
        drop(slot);
        let _ = self.tx.send(event);
    }
}

fn log_event(event: &ProgressEvent) {
    debug!(
        request_id = %event.request_id,
        phase = ?event.phase,
        status = %event.status,
        "Progress"
    );
}

/// The parts of the orchestrator a running request needs.
#[derive(Clone)]
struct Pipeline {
    classifier: UrlClassifier,
    resolver: Arc<MetadataResolver>,
    locator: Arc<dyn AudioLocator>,
    events: EventPublisher,
}

impl Pipeline {
    /// Runs one request to completion and always ends with a terminal event,
    /// even when a backend panics. `slot` is held until that event is recorded.
    async fn run(self, request: DownloadRequest, slot: OwnedMutexGuard<()>) {
        REQUEST_ACTIVE.set(1);
        let started = Instant::now();
        let id = request.id;

        let worker = self.clone();
        let job = request.clone();
        let result = match tokio::spawn(async move { worker.execute(&job).await }).await {
            Ok(result) => result,
            Err(e) => {
                error!(request_id = %id, error = %e, "Download worker aborted");
                Err(PipelineError::Aborted(e.to_string()))
            }
        };

        let elapsed = started.elapsed();
        REQUEST_ACTIVE.set(0);

        let event = match result {
            Ok(outcome) => {
                info!(
                    request_id = %id,
                    path = %outcome.path.display(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Download succeeded"
                );
                REQUESTS_TOTAL.with_label_values(&["succeeded"]).inc();
                PIPELINE_DURATION
                    .with_label_values(&["succeeded"])
                    .observe(elapsed.as_secs_f64());
                ProgressEvent::succeeded(
                    id,
                    format!(
                        "Successfully downloaded: {}",
                        outcome.candidate.display_name()
                    ),
                )
            }
            Err(e) => {
                warn!(request_id = %id, error = %e, "Download failed");
                REQUESTS_TOTAL.with_label_values(&["failed"]).inc();
                PIPELINE_DURATION
                    .with_label_values(&["failed"])
                    .observe(elapsed.as_secs_f64());
                ProgressEvent::failed(id, e.to_string())
            }
        };

        self.events.publish_terminal(event, slot).await;
    }

    async fn execute(&self, request: &DownloadRequest) -> Result<DownloadOutcome, PipelineError> {
        let id = request.id;

        self.emit(id, Phase::Classifying, Some(0.0), "Preparing to download...")
            .await;
        let reference = self.classifier.classify(&request.url);
        debug!(request_id = %id, kind = %reference.kind, id = %reference.id, "Classified");

        self.emit(id, Phase::Resolving, Some(0.2), "Fetching metadata...")
            .await;
        let query = self.resolver.resolve(&reference).await?;

        self.emit(id, Phase::Searching, None, "Searching for audio...")
            .await;
        let candidates = self.locator.search(&query).await?;
        info!(
            request_id = %id,
            query = %query,
            results = candidates.len(),
            locator = self.locator.name(),
            "Search finished"
        );
        let candidate = select_candidate(candidates)?;

        self.emit(
            id,
            Phase::Searching,
            Some(0.4),
            format!("Found: {}", candidate.display_name()),
        )
        .await;

        self.emit(id, Phase::Downloading, Some(0.6), "Downloading...")
            .await;
        let path = self.locator.fetch(&candidate, &request.destination).await?;

        Ok(DownloadOutcome { candidate, path })
    }

    async fn emit(&self, id: RequestId, phase: Phase, fraction: Option<f32>, status: impl Into<String>) {
        self.events
            .publish(ProgressEvent::progress(id, phase, fraction, status))
            .await;
    }
}

/// Accepts download requests and runs them one at a time.
///
/// The process working directory is never changed; the destination travels
/// with the request down to the locator.
pub struct DownloadOrchestrator {
    pipeline: Pipeline,
    default_destination: Option<PathBuf>,
    slot: Arc<Mutex<()>>,
}

impl DownloadOrchestrator {
    /// Create an orchestrator with a resolver built from `config`.
    pub fn new(
        catalog: Arc<dyn MetadataCatalog>,
        locator: Arc<dyn AudioLocator>,
        config: &PipelineConfig,
    ) -> Self {
        let resolver = MetadataResolver::new(catalog)
            .with_retry_policy(config.retry_policy())
            .with_pacing(config.pacing());

        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            pipeline: Pipeline {
                classifier: UrlClassifier::default(),
                resolver: Arc::new(resolver),
                locator,
                events: EventPublisher {
                    tx,
                    last_event: Arc::new(RwLock::new(None)),
                },
            },
            default_destination: config.default_destination.clone(),
            slot: Arc::new(Mutex::new(())),
        }
    }

    /// Replace the resolver (retry policy, pacing).
    pub fn with_resolver(mut self, resolver: MetadataResolver) -> Self {
        self.pipeline.resolver = Arc::new(resolver);
        self
    }

    /// Accept links for a different catalog domain.
    pub fn with_classifier(mut self, classifier: UrlClassifier) -> Self {
        self.pipeline.classifier = classifier;
        self
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.pipeline.events.tx.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.slot.try_lock().is_err()
    }

    pub async fn status(&self) -> OrchestratorStatus {
        OrchestratorStatus {
            busy: self.is_busy(),
            last_event: self.pipeline.events.last_event.read().await.clone(),
        }
    }

    /// Validate and start a request.
    ///
    /// Returns [`SubmitError::Busy`] without side effects while another request
    /// runs. Invalid input publishes a `Failed` event and never starts the
    /// pipeline. On success the pipeline runs on its own task.
    pub async fn submit(
        &self,
        url: &str,
        destination: Option<PathBuf>,
    ) -> Result<RequestId, SubmitError> {
        let slot = match self.slot.clone().try_lock_owned() {
            Ok(slot) => slot,
            Err(_) => {
                warn!(url = %url, "Rejecting submission, a download is already in progress");
                REQUESTS_TOTAL.with_label_values(&["busy"]).inc();
                return Err(SubmitError::Busy);
            }
        };

        let id = RequestId::new();
        let request = match self.validate(id, url, destination).await {
            Ok(request) => request,
            Err(e) => {
                drop(slot);
                warn!(request_id = %id, error = %e, "Rejecting invalid submission");
                REQUESTS_TOTAL.with_label_values(&["invalid"]).inc();
                self.pipeline
                    .events
                    .publish(ProgressEvent::failed(id, e.to_string()))
                    .await;
                return Err(e.into());
            }
        };

        info!(
            request_id = %id,
            url = %request.url,
            destination = %request.destination.display(),
            "Starting download"
        );

        let pipeline = self.pipeline.clone();
        tokio::spawn(pipeline.run(request, slot));

        Ok(id)
    }

    async fn validate(
        &self,
        id: RequestId,
        url: &str,
        destination: Option<PathBuf>,
    ) -> Result<DownloadRequest, ValidationError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        if !self.pipeline.classifier.is_catalog_url(url) {
            return Err(ValidationError::InvalidUrl(url.to_string()));
        }

        let destination = match destination.filter(|d| !d.as_os_str().is_empty()) {
            Some(dir) => dir,
            None => self.default_destination()?,
        };

        tokio::fs::create_dir_all(&destination)
            .await
            .map_err(|e| ValidationError::Destination {
                path: destination.clone(),
                reason: e.to_string(),
            })?;

        let destination = tokio::fs::canonicalize(&destination)
            .await
            .map_err(|e| ValidationError::Destination {
                path: destination.clone(),
                reason: e.to_string(),
            })?;

        Ok(DownloadRequest {
            id,
            url: url.to_string(),
            destination,
            submitted_at: Utc::now(),
        })
    }

    fn default_destination(&self) -> Result<PathBuf, ValidationError> {
        if let Some(dir) = &self.default_destination {
            return Ok(dir.clone());
        }
        std::env::current_dir().map_err(|e| {
            error!(error = %e, "Cannot determine working directory");
            ValidationError::Destination {
                path: PathBuf::from("."),
                reason: e.to_string(),
            }
        })
    }
}
