use crate::application::manager::TranslationManager;
use crate::domain::error::TranslateError;
use crate::infrastructure::config::Config;
use crate::infrastructure::engine::OfflineEngine;
use crate::infrastructure::network::http::create_client;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Composition root: owns the one translation manager of the application
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub engine: Arc<OfflineEngine>,
    manager: Arc<TranslationManager>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, TranslateError> {
        let options = config.translator_options()?;
        let http_client = create_client(&config)?;
        let engine = Arc::new(OfflineEngine::from_config(&config, http_client));
        let manager = Arc::new(TranslationManager::new(
            engine.clone(),
            options,
            config.download_conditions(),
        ));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            engine,
            manager,
        })
    }

    /// The shared manager; every call returns the same instance
    pub fn manager(&self) -> Arc<TranslationManager> {
        self.manager.clone()
    }
}
