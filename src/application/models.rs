use crate::domain::error::TranslateError;
use crate::domain::model::{Connectivity, ModelManifest, ModelPhase, TranslatorOptions};
use crate::domain::traits::TranslationEngine;
use crate::state::AppState;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub pair: TranslatorOptions,
    pub phase: ModelPhase,
    pub ready: bool,
    pub installed: bool,
    pub model_dir: PathBuf,
    pub manifest: Option<ModelManifest>,
    pub connectivity: Connectivity,
    pub last_error: Option<String>,
}

/// Run `init` and wait for the download to settle
pub async fn download_model(state: &AppState) -> Result<(), TranslateError> {
    let manager = state.manager();
    manager
        .init()
        .await
        .map_err(|e| TranslateError::Engine(format!("Download task failed: {}", e)))?;

    if manager.is_ready() {
        Ok(())
    } else {
        Err(TranslateError::Download(
            manager
                .last_error()
                .unwrap_or_else(|| "unknown error".to_string()),
        ))
    }
}

/// Remove the installed model for the configured pair
///
/// Returns `false` when no model was installed.
pub async fn delete_model(state: &AppState) -> Result<bool, TranslateError> {
    let manager = state.manager();
    let options = *manager.options();
    let installed = state.engine.store().is_installed(&options).await?;

    // Go through the live client when there is one so it drops its open table
    let translator = manager
        .translator()
        .unwrap_or_else(|| state.engine.client(&options));
    translator.delete_downloaded_model().await?;
    Ok(installed)
}

pub async fn model_status(state: &AppState) -> Result<ModelStatus, TranslateError> {
    let manager = state.manager();
    let options = *manager.options();
    let store = state.engine.store();
    let connectivity = state.config.read().await.network.connectivity;

    Ok(ModelStatus {
        pair: options,
        phase: manager.phase(),
        ready: manager.is_ready(),
        installed: store.is_installed(&options).await?,
        model_dir: store.model_dir(&options),
        manifest: store.read_manifest(&options).await?,
        connectivity,
        last_error: manager.last_error(),
    })
}
