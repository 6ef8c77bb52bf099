use crate::domain::error::TranslateError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the offline engine can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ro")]
    Romanian,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "nl")]
    Dutch,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::Romanian,
        Language::French,
        Language::German,
        Language::Spanish,
        Language::Italian,
        Language::Portuguese,
        Language::Dutch,
    ];

    /// Two-letter ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Romanian => "ro",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Dutch => "nl",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| TranslateError::Config(format!("Unsupported language: {}", s)))
    }
}

/// Fixed language pair a translator client is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTranslatorOptions")]
pub struct TranslatorOptions {
    pub source: Language,
    pub target: Language,
}

#[derive(Deserialize)]
struct RawTranslatorOptions {
    source: Language,
    target: Language,
}

impl TryFrom<RawTranslatorOptions> for TranslatorOptions {
    type Error = TranslateError;

    fn try_from(raw: RawTranslatorOptions) -> Result<Self, Self::Error> {
        Self::new(raw.source, raw.target)
    }
}

impl TranslatorOptions {
    pub fn new(source: Language, target: Language) -> Result<Self, TranslateError> {
        if source == target {
            return Err(TranslateError::Config(format!(
                "Source and target language are both '{}'",
                source
            )));
        }
        Ok(Self { source, target })
    }

    /// Identifier used for model archives and directories, e.g. `en-ro`
    pub fn pair_id(&self) -> String {
        format!("{}-{}", self.source, self.target)
    }
}

/// Network state as seen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Unmetered,
    Metered,
    Offline,
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Connectivity::Unmetered => "unmetered",
            Connectivity::Metered => "metered",
            Connectivity::Offline => "offline",
        };
        f.write_str(name)
    }
}

/// Requirements a model download must satisfy before it starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadConditions {
    pub require_unmetered: bool,
}

impl DownloadConditions {
    /// Download only over an unmetered (Wi-Fi style) connection
    pub fn unmetered() -> Self {
        Self {
            require_unmetered: true,
        }
    }

    pub fn allows(&self, connectivity: Connectivity) -> bool {
        match connectivity {
            Connectivity::Offline => false,
            Connectivity::Metered => !self.require_unmetered,
            Connectivity::Unmetered => true,
        }
    }

    pub fn required_name(&self) -> &'static str {
        if self.require_unmetered {
            "unmetered"
        } else {
            "any"
        }
    }
}

/// Lifecycle of the model behind a manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelPhase {
    Uninitialized,
    Downloading,
    Ready,
    Failed,
}

impl ModelPhase {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            ModelPhase::Uninitialized => 0,
            ModelPhase::Downloading => 1,
            ModelPhase::Ready => 2,
            ModelPhase::Failed => 3,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => ModelPhase::Downloading,
            2 => ModelPhase::Ready,
            3 => ModelPhase::Failed,
            _ => ModelPhase::Uninitialized,
        }
    }
}

/// How a translation request was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Input was empty or absent
    Empty,
    /// Model not ready, original text passed through
    NotReady,
    /// Engine produced a translation
    Translated,
    /// Engine failed, original text returned
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub text: String,
    pub outcome: Outcome,
}

impl Translation {
    pub fn new(text: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            text: text.into(),
            outcome,
        }
    }
}

// 模型安装信息, 与 phrases.db 一起存放
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelManifest {
    pub pair: TranslatorOptions,
    pub source_url: String,
    pub sha256: String,
    pub archive_size: u64,
    pub installed_at: DateTime<Utc>,
}
