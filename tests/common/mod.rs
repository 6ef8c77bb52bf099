//! 测试共用工具: fake engine, 本地 HTTP 服务, 模型压缩包

#![allow(dead_code)]

use async_trait::async_trait;
use kb_translate::infrastructure::storage::db::{batch_insert_phrases, create_phrase_table};
use kb_translate::{
    DownloadConditions, Language, TranslateError, TranslationEngine, Translator,
    TranslatorOptions,
};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

pub fn en_ro() -> TranslatorOptions {
    TranslatorOptions::new(Language::English, Language::Romanian).unwrap()
}

/// Engine whose clients succeed or fail on demand
#[derive(Default)]
pub struct FakeEngine {
    pub download_fails: AtomicBool,
    pub translate_fails: AtomicBool,
    pub clients_built: AtomicUsize,
    pub translate_calls: Arc<AtomicUsize>,
    /// When set, downloads wait for a notification before settling
    pub gate: Option<Arc<Notify>>,
}

impl FakeEngine {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_download() -> Arc<Self> {
        let engine = Self::default();
        engine.download_fails.store(true, Ordering::SeqCst);
        Arc::new(engine)
    }

    pub fn failing_translate() -> Arc<Self> {
        let engine = Self::default();
        engine.translate_fails.store(true, Ordering::SeqCst);
        Arc::new(engine)
    }

    pub fn gated(gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            gate: Some(gate),
            ..Self::default()
        })
    }

    pub fn translate_calls(&self) -> usize {
        self.translate_calls.load(Ordering::SeqCst)
    }
}

impl TranslationEngine for FakeEngine {
    fn client(&self, _options: &TranslatorOptions) -> Arc<dyn Translator> {
        self.clients_built.fetch_add(1, Ordering::SeqCst);
        Arc::new(FakeTranslator {
            download_fails: self.download_fails.load(Ordering::SeqCst),
            translate_fails: self.translate_fails.load(Ordering::SeqCst),
            translate_calls: self.translate_calls.clone(),
            gate: self.gate.clone(),
        })
    }
}

pub struct FakeTranslator {
    download_fails: bool,
    translate_fails: bool,
    translate_calls: Arc<AtomicUsize>,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn download_model_if_needed(
        &self,
        _conditions: &DownloadConditions,
    ) -> Result<(), TranslateError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.download_fails {
            Err(TranslateError::Download("network unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        if self.translate_fails {
            Err(TranslateError::Engine("inference failed".to_string()))
        } else {
            Ok(format!("ro:{}", text))
        }
    }

    async fn is_model_downloaded(&self) -> Result<bool, TranslateError> {
        Ok(!self.download_fails)
    }

    async fn delete_downloaded_model(&self) -> Result<(), TranslateError> {
        Ok(())
    }
}

/// Write a phrase table to `path`
pub async fn write_phrase_db(path: &Path, phrases: &[(&str, &str)]) {
    let db = tokio_rusqlite::Connection::open(path.to_path_buf())
        .await
        .unwrap();
    create_phrase_table(&db).await.unwrap();
    let items = phrases
        .iter()
        .map(|(s, t)| (s.to_string(), t.to_string()))
        .collect();
    batch_insert_phrases(&db, items).await.unwrap();
}

/// Zip archive holding `entries` as (name, bytes)
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Model archive containing a phrase table built from `phrases`
pub async fn model_archive(phrases: &[(&str, &str)]) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("en-ro.db");
    write_phrase_db(&db_path, phrases).await;
    let db_bytes = std::fs::read(&db_path).unwrap();
    zip_bytes(&[
        ("README.txt", b"phrase table".as_slice()),
        ("data/en-ro.db", db_bytes.as_slice()),
    ])
}

/// Serve a single fixed HTTP response on a loopback port
///
/// Returns the base URL and a handle resolving to the number of requests
/// served (at most `max_requests`).
pub async fn serve(status: u16, body: Vec<u8>, max_requests: usize) -> (String, JoinHandle<usize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut served = 0;
        while served < max_requests {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let head = format!(
                "HTTP/1.1 {} TEST\r\nContent-Type: application/zip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&body).await;
            let _ = socket.shutdown().await;
            served += 1;
        }
        served
    });

    (format!("http://{}/models", addr), handle)
}
