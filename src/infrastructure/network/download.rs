use crate::domain::error::TranslateError;
use crate::domain::model::{ModelManifest, TranslatorOptions};
use crate::infrastructure::storage::model_store::ModelStore;
use chrono::Utc;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Fetches model archives and installs them into a [`ModelStore`]
#[derive(Debug, Clone)]
pub struct ModelDownloader {
    client: Client,
    store: ModelStore,
    base_url: String,
    show_progress: bool,
}

impl ModelDownloader {
    pub fn new(client: Client, store: ModelStore, base_url: impl Into<String>) -> Self {
        Self {
            client,
            store,
            base_url: base_url.into(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn archive_url(&self, options: &TranslatorOptions) -> String {
        format!(
            "{}/{}.zip",
            self.base_url.trim_end_matches('/'),
            options.pair_id()
        )
    }

    /// Download, extract and install the model for `options`
    ///
    /// Staging files are cleaned up whether or not the install succeeds.
    pub async fn download_and_install(
        &self,
        options: &TranslatorOptions,
    ) -> Result<ModelManifest, TranslateError> {
        tokio::fs::create_dir_all(self.store.root()).await?;

        let url = self.archive_url(options);
        let zip_path = self.store.staging_path(".zip");
        let staging_dir = self.store.staging_path("");

        let result = self
            .fetch_and_install(options, &url, &zip_path, &staging_dir)
            .await;

        cleanup(&zip_path, &staging_dir).await;
        result
    }

    async fn fetch_and_install(
        &self,
        options: &TranslatorOptions,
        url: &str,
        zip_path: &Path,
        staging_dir: &Path,
    ) -> Result<ModelManifest, TranslateError> {
        info!(%url, pair = %options.pair_id(), "Downloading translation model");
        let (sha256, archive_size) =
            download_file(&self.client, url, zip_path, self.show_progress).await?;
        debug!(%sha256, archive_size, "Archive downloaded");

        extract_zip(zip_path, staging_dir).await?;

        let staged_db = find_db_file(staging_dir).await.ok_or_else(|| {
            TranslateError::Download(format!("Archive from {} contains no phrase table", url))
        })?;

        let manifest = ModelManifest {
            pair: *options,
            source_url: url.to_string(),
            sha256,
            archive_size,
            installed_at: Utc::now(),
        };
        self.store.install(&staged_db, &manifest).await?;
        info!(pair = %options.pair_id(), "Model installed");
        Ok(manifest)
    }
}

/// Stream `url` into `path`, returning the hex SHA-256 and byte count
async fn download_file(
    client: &Client,
    url: &str,
    path: &Path,
    show_progress: bool,
) -> Result<(String, u64), TranslateError> {
    let res = client.get(url).send().await?;
    let status = res.status();
    if !status.is_success() {
        return Err(TranslateError::Download(format!("HTTP {} from {}", status, url)));
    }
    let total_size = res.content_length().unwrap_or(0);

    let pb = if show_progress {
        let pb = ProgressBar::new(total_size);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .map_err(|e| TranslateError::Download(e.to_string()))?
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut file = File::create(path).await?;
    let mut stream = res.bytes_stream();
    let mut hasher = Sha256::new();
    let mut written: u64 = 0;

    while let Some(item) = stream.next().await {
        let chunk = item.map_err(TranslateError::Http)?;
        hasher.update(&chunk);
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        pb.inc(chunk.len() as u64);
    }
    file.flush().await?;

    pb.finish_with_message("Downloaded");
    Ok((hex::encode(hasher.finalize()), written))
}

async fn extract_zip(zip_path: &Path, dest: &Path) -> Result<(), TranslateError> {
    // Use spawn_blocking for CPU-intensive zip extraction
    let zip_path = zip_path.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<(), TranslateError> {
        use std::fs::File as StdFile;

        let file = StdFile::open(&zip_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        std::fs::create_dir_all(&dest)?;

        debug!(entries = archive.len(), "Extracting model archive");
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let Some(relative) = file.enclosed_name() else {
                warn!(name = file.name(), "Skipping archive entry with unsafe path");
                continue;
            };
            let outpath = dest.join(relative);

            if file.is_dir() {
                std::fs::create_dir_all(&outpath)?;
            } else {
                if let Some(p) = outpath.parent() {
                    std::fs::create_dir_all(p)?;
                }
                let mut outfile = StdFile::create(&outpath)?;
                std::io::copy(&mut file, &mut outfile)?;
            }
        }
        Ok(())
    })
    .await
    .map_err(|e| TranslateError::Io(std::io::Error::other(format!("Task join error: {}", e))))?
}

/// First `*.db` file under `dir`, searching sub-directories too
async fn find_db_file(dir: &Path) -> Option<PathBuf> {
    let dir = dir.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut pending = vec![dir];
        while let Some(current) = pending.pop() {
            let Ok(entries) = std::fs::read_dir(&current) else {
                continue;
            };
            let mut entries: Vec<_> = entries.flatten().map(|e| e.path()).collect();
            entries.sort();
            for path in entries {
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().and_then(|s| s.to_str()) == Some("db") {
                    return Some(path);
                }
            }
        }
        None
    })
    .await
    .ok()?
}

async fn cleanup(zip_path: &Path, staging_dir: &Path) {
    if let Err(e) = tokio::fs::remove_file(zip_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %zip_path.display(), error = %e, "Failed to remove staged archive");
        }
    }
    if let Err(e) = tokio::fs::remove_dir_all(staging_dir).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %staging_dir.display(), error = %e, "Failed to remove staging directory");
        }
    }
}
