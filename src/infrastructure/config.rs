use crate::domain::error::TranslateError;
use crate::domain::model::{Connectivity, DownloadConditions, Language, TranslatorOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "kbt";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    pub http_proxy: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    #[serde(default = "default_source")]
    pub source: Language,
    #[serde(default = "default_target")]
    pub target: Language,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overrides the platform data directory
    pub dir: Option<String>,
    #[serde(default = "default_true")]
    pub require_unmetered: bool,
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NetworkConfig {
    // 桌面系统无法判断是否计费网络, 由配置声明
    #[serde(default = "default_connectivity")]
    pub connectivity: Connectivity,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_true")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Logging {
    /// Map the configured level onto an `EnvFilter` directive
    pub fn filter_directive(&self) -> &'static str {
        match self.level.to_ascii_uppercase().as_str() {
            "DEBUG" => "debug",
            "INFO" => "info",
            "WARN" => "warn",
            "ERROR" => "error",
            _ => "warn",
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            target: default_target(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            dir: None,
            require_unmetered: true,
            show_progress: true,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connectivity: default_connectivity(),
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            http_proxy: None,
            timeout_secs: default_timeout_secs(),
            translation: TranslationConfig::default(),
            model: ModelConfig::default(),
            network: NetworkConfig::default(),
            logging: Logging::default(),
        }
    }
}

impl Config {
    pub fn translator_options(&self) -> Result<TranslatorOptions, TranslateError> {
        TranslatorOptions::new(self.translation.source, self.translation.target)
    }

    pub fn download_conditions(&self) -> DownloadConditions {
        DownloadConditions {
            require_unmetered: self.model.require_unmetered,
        }
    }
}

// Defaults
fn default_theme() -> String {
    "plain".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_source() -> Language {
    Language::English
}
fn default_target() -> Language {
    Language::Romanian
}
fn default_base_url() -> String {
    "https://models.kbt.example.org/phrase-tables/v1".to_string()
}
fn default_connectivity() -> Connectivity {
    Connectivity::Unmetered
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
}

/// Root directory holding one sub-directory per installed language pair
pub fn get_model_root(config: &Config) -> PathBuf {
    if let Some(dir) = config.model.dir.as_deref().filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    // ~/.local/share/kbt/models (Linux)
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("models")
}

pub fn parse_config(content: &str) -> Result<Config, TranslateError> {
    let config = toml::from_str::<Config>(content)?;
    // Reject same-language pairs early, before anything is downloaded
    config.translator_options()?;
    Ok(config)
}

pub fn load_config() -> Result<Config, TranslateError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match parse_config(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

pub fn generate_config_sample() -> Result<(), TranslateError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            eprintln!("Config file already exists at: {}", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sample = Config::default();
        let toml_content = toml::to_string_pretty(&sample)
            .map_err(|e| TranslateError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, toml_content)
            .map_err(|e| TranslateError::Config(format!("Failed to write config file: {}", e)))?;
        println!("Generated config file at: {}", path.display());
    } else {
        return Err(TranslateError::Config(
            "Cannot determine config directory".to_string(),
        ));
    }

    Ok(())
}
