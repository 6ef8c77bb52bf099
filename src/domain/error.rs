use crate::domain::model::Connectivity;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model download failed: {0}")]
    Download(String),

    #[error("Download conditions not met: requires {required} connection, current is {actual}")]
    ConditionsNotMet {
        required: &'static str,
        actual: Connectivity,
    },

    #[error("Translation model not installed: {0}")]
    ModelMissing(String),

    #[error("Engine error: {0}")]
    Engine(String),
}
