use crate::domain::error::TranslateError;
use crate::domain::model::{Connectivity, DownloadConditions, TranslatorOptions};
use async_trait::async_trait;
use std::sync::Arc;

/// Factory for translator clients
///
/// The manager only talks to this seam, so the offline engine can be
/// swapped for another backend (or a fake in tests).
pub trait TranslationEngine: Send + Sync {
    /// Build a client for a fixed language pair
    fn client(&self, options: &TranslatorOptions) -> Arc<dyn Translator>;
}

/// A translator client bound to one language pair
#[async_trait]
pub trait Translator: Send + Sync {
    /// Fetch the model unless it is already installed
    async fn download_model_if_needed(
        &self,
        conditions: &DownloadConditions,
    ) -> Result<(), TranslateError>;

    async fn translate(&self, text: &str) -> Result<String, TranslateError>;

    async fn is_model_downloaded(&self) -> Result<bool, TranslateError>;

    async fn delete_downloaded_model(&self) -> Result<(), TranslateError>;
}

/// Reports the current connectivity of the host
pub trait NetworkMonitor: Send + Sync {
    fn connectivity(&self) -> Connectivity;
}

/// One-shot receiver of a translation result
pub trait OnTranslationResult: Send + 'static {
    fn on_result(self, text: String);
}

impl<F> OnTranslationResult for F
where
    F: FnOnce(String) + Send + 'static,
{
    fn on_result(self, text: String) {
        self(text)
    }
}
