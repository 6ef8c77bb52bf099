use crate::domain::error::TranslateError;
use crate::domain::model::{DownloadConditions, TranslatorOptions};
use crate::domain::traits::{NetworkMonitor, TranslationEngine, Translator};
use crate::infrastructure::config::{get_model_root, Config};
use crate::infrastructure::network::connectivity::StaticNetwork;
use crate::infrastructure::network::download::ModelDownloader;
use crate::infrastructure::storage::cache::PhraseCache;
use crate::infrastructure::storage::db::{open_phrase_table, translate_phrases};
use crate::infrastructure::storage::model_store::ModelStore;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Offline phrase-table engine backed by downloadable SQLite models
pub struct OfflineEngine {
    downloader: ModelDownloader,
    network: Arc<dyn NetworkMonitor>,
}

impl OfflineEngine {
    pub fn new(downloader: ModelDownloader, network: Arc<dyn NetworkMonitor>) -> Self {
        Self {
            downloader,
            network,
        }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        let store = ModelStore::new(get_model_root(config));
        let downloader = ModelDownloader::new(client, store, config.model.base_url.clone())
            .with_progress(config.model.show_progress);
        Self::new(
            downloader,
            Arc::new(StaticNetwork(config.network.connectivity)),
        )
    }

    pub fn store(&self) -> &ModelStore {
        self.downloader.store()
    }
}

impl TranslationEngine for OfflineEngine {
    fn client(&self, options: &TranslatorOptions) -> Arc<dyn Translator> {
        Arc::new(OfflineTranslator {
            options: *options,
            downloader: self.downloader.clone(),
            network: self.network.clone(),
            table: Mutex::new(None),
            cache: PhraseCache::default(),
        })
    }
}

pub struct OfflineTranslator {
    options: TranslatorOptions,
    downloader: ModelDownloader,
    network: Arc<dyn NetworkMonitor>,
    table: Mutex<Option<Connection>>,
    cache: PhraseCache,
}

impl OfflineTranslator {
    /// Open the phrase table on first use
    async fn table(&self) -> Result<Connection, TranslateError> {
        let mut guard = self.table.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }
        let path = self.downloader.store().phrase_db_path(&self.options);
        let conn = open_phrase_table(&path).await?;
        debug!(path = %path.display(), "Opened phrase table");
        *guard = Some(conn.clone());
        Ok(conn)
    }
}

#[async_trait]
impl Translator for OfflineTranslator {
    async fn download_model_if_needed(
        &self,
        conditions: &DownloadConditions,
    ) -> Result<(), TranslateError> {
        if self.downloader.store().is_installed(&self.options).await? {
            debug!(pair = %self.options.pair_id(), "Model already present");
            return Ok(());
        }

        let connectivity = self.network.connectivity();
        if !conditions.allows(connectivity) {
            return Err(TranslateError::ConditionsNotMet {
                required: conditions.required_name(),
                actual: connectivity,
            });
        }

        self.downloader.download_and_install(&self.options).await?;
        Ok(())
    }

    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        if let Some(hit) = self.cache.get(text) {
            return Ok(hit);
        }

        let table = self.table().await?;
        let translated = translate_phrases(&table, text).await?;
        self.cache.insert(text.to_string(), translated.clone());
        Ok(translated)
    }

    async fn is_model_downloaded(&self) -> Result<bool, TranslateError> {
        self.downloader.store().is_installed(&self.options).await
    }

    async fn delete_downloaded_model(&self) -> Result<(), TranslateError> {
        self.table.lock().await.take();
        self.cache.clear();
        if !self.downloader.store().remove(&self.options).await? {
            debug!(pair = %self.options.pair_id(), "No model to delete");
        }
        Ok(())
    }
}
