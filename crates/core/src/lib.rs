pub mod catalog;
pub mod config;
pub mod content;
pub mod locator;
pub mod metrics;
pub mod orchestrator;
pub mod resolver;
pub mod retry;
pub mod testing;

pub use catalog::{CatalogError, MetadataCatalog, SpotifyClient, SpotifyConfig};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use content::{classify, is_catalog_url, ContentKind, ContentReference, SearchQuery, UrlClassifier};
pub use locator::{
    AudioFormat, AudioLocator, AudioProvider, DownloaderConfig, LocatorError, SongCandidate,
    YtDlpLocator,
};
pub use orchestrator::{
    DownloadOrchestrator, OrchestratorStatus, Outcome, Phase, PipelineConfig, ProgressEvent,
    RequestId, SubmitError, ValidationError,
};
pub use resolver::{MetadataResolver, ResolveError};
pub use retry::{with_retry, RetryPolicy};
