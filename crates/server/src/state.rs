use std::sync::Arc;
use tunefetch_core::{Config, DownloadOrchestrator, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: Arc<DownloadOrchestrator>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Arc<DownloadOrchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn orchestrator(&self) -> &DownloadOrchestrator {
        self.orchestrator.as_ref()
    }
}
