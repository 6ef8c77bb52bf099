use crate::domain::error::TranslateError;
use crate::domain::model::{ModelManifest, TranslatorOptions};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const PHRASE_DB: &str = "phrases.db";
const MANIFEST: &str = "manifest.json";

/// On-disk layout of installed models
///
/// ```text
/// <root>/
///   en-ro/
///     phrases.db
///     manifest.json
///   .staging-<uuid>.zip   (in-flight downloads)
/// ```
///
/// A model counts as installed once its manifest is written, which happens
/// after the phrase table is in place.
#[derive(Debug, Clone)]
pub struct ModelStore {
    root: PathBuf,
}

impl ModelStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn model_dir(&self, options: &TranslatorOptions) -> PathBuf {
        self.root.join(options.pair_id())
    }

    pub fn phrase_db_path(&self, options: &TranslatorOptions) -> PathBuf {
        self.model_dir(options).join(PHRASE_DB)
    }

    fn manifest_path(&self, options: &TranslatorOptions) -> PathBuf {
        self.model_dir(options).join(MANIFEST)
    }

    /// Unique scratch path under the root, so parallel downloads never collide
    pub fn staging_path(&self, suffix: &str) -> PathBuf {
        self.root
            .join(format!(".staging-{}{}", Uuid::new_v4().simple(), suffix))
    }

    pub async fn is_installed(&self, options: &TranslatorOptions) -> Result<bool, TranslateError> {
        let manifest = tokio::fs::try_exists(self.manifest_path(options)).await?;
        let db = tokio::fs::try_exists(self.phrase_db_path(options)).await?;
        Ok(manifest && db)
    }

    pub async fn read_manifest(
        &self,
        options: &TranslatorOptions,
    ) -> Result<Option<ModelManifest>, TranslateError> {
        let path = self.manifest_path(options);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }
        let bytes = tokio::fs::read(&path).await?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Move a staged phrase table into place and record its manifest
    pub async fn install(
        &self,
        staged_db: &Path,
        manifest: &ModelManifest,
    ) -> Result<(), TranslateError> {
        let dir = self.model_dir(&manifest.pair);
        tokio::fs::create_dir_all(&dir).await?;

        // Drop a stale manifest first so a half-finished install never looks complete
        let manifest_path = self.manifest_path(&manifest.pair);
        if tokio::fs::try_exists(&manifest_path).await? {
            tokio::fs::remove_file(&manifest_path).await?;
        }

        tokio::fs::rename(staged_db, self.phrase_db_path(&manifest.pair)).await?;
        let content = serde_json::to_vec_pretty(manifest)?;
        tokio::fs::write(&manifest_path, content).await?;
        Ok(())
    }

    /// Returns `false` when there was nothing to remove
    pub async fn remove(&self, options: &TranslatorOptions) -> Result<bool, TranslateError> {
        let dir = self.model_dir(options);
        if !tokio::fs::try_exists(&dir).await? {
            return Ok(false);
        }
        tokio::fs::remove_dir_all(&dir).await?;
        Ok(true)
    }

    pub async fn list_installed(&self) -> Result<Vec<ModelManifest>, TranslateError> {
        let mut manifests = Vec::new();
        if !tokio::fs::try_exists(&self.root).await? {
            return Ok(manifests);
        }

        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path().join(MANIFEST);
            if !tokio::fs::try_exists(&path).await? {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<ModelManifest>(&bytes) {
                Ok(manifest) => manifests.push(manifest),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable manifest"),
            }
        }
        manifests.sort_by_key(|m| m.pair.pair_id());
        Ok(manifests)
    }
}
