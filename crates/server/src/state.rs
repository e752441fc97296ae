use std::sync::Arc;

use reelstitch_core::{Config, MediaClient, SanitizedConfig, StitchOrchestrator};

/// Shared application state
pub struct AppState {
    config: Config,
    media_client: Arc<dyn MediaClient>,
    orchestrator: StitchOrchestrator,
}

impl AppState {
    pub fn new(config: Config, media_client: Arc<dyn MediaClient>) -> Self {
        let orchestrator = StitchOrchestrator::new(Arc::clone(&media_client));
        Self {
            config,
            media_client,
            orchestrator,
        }
    }

    pub fn static_dir(&self) -> &str {
        &self.config.server.static_dir
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn media_client(&self) -> &dyn MediaClient {
        self.media_client.as_ref()
    }

    pub fn orchestrator(&self) -> &StitchOrchestrator {
        &self.orchestrator
    }
}
