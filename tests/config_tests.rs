//! 配置功能测试

use kb_translate::infrastructure::config::{get_model_root, parse_config, Config, Logging};
use kb_translate::{AppState, Connectivity, Language, TranslatorOptions};
use std::path::PathBuf;
use std::sync::Arc;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.theme, "plain");
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.translation.source, Language::English);
    assert_eq!(config.translation.target, Language::Romanian);
    assert!(config.model.require_unmetered);
    assert!(config.model.show_progress);
    assert_eq!(config.network.connectivity, Connectivity::Unmetered);
    assert!(config.download_conditions().require_unmetered);
    assert_eq!(config.translator_options().unwrap().pair_id(), "en-ro");
}

#[test]
fn test_empty_file_uses_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config.translation.target, Language::Romanian);
    assert!(config.logging.enable);
    assert_eq!(config.logging.level, "WARN");
}

#[test]
fn test_config_toml_format() {
    let toml_content = r#"
theme = "vivid"
timeout_secs = 5

[translation]
source = "en"
target = "fr"

[model]
base_url = "https://mirror.example.com/models"
dir = "/tmp/kbt-models"
require_unmetered = false
show_progress = false

[network]
connectivity = "metered"

[logging]
enable = true
path = "/tmp/kbt.log"
level = "DEBUG"
"#;

    let config = parse_config(toml_content).unwrap();
    assert_eq!(config.theme, "vivid");
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.translation.target, Language::French);
    assert_eq!(config.model.base_url, "https://mirror.example.com/models");
    assert!(!config.download_conditions().require_unmetered);
    assert_eq!(config.network.connectivity, Connectivity::Metered);
    assert_eq!(config.logging.path.as_deref(), Some("/tmp/kbt.log"));
    assert_eq!(get_model_root(&config), PathBuf::from("/tmp/kbt-models"));
}

#[test]
fn test_same_language_pair_rejected() {
    let err = parse_config("[translation]\nsource = \"ro\"\ntarget = \"ro\"\n").unwrap_err();
    assert!(err.to_string().contains("both 'ro'"));

    assert!(TranslatorOptions::new(Language::German, Language::German).is_err());
}

#[test]
fn test_deserialized_pair_is_validated() {
    let err = serde_json::from_str::<TranslatorOptions>(r#"{"source":"ro","target":"ro"}"#)
        .unwrap_err();
    assert!(err.to_string().contains("both 'ro'"));

    let options: TranslatorOptions =
        serde_json::from_str(r#"{"source":"en","target":"ro"}"#).unwrap();
    assert_eq!(options, TranslatorOptions::new(Language::English, Language::Romanian).unwrap());
    assert_eq!(options.pair_id(), "en-ro");
}

#[test]
fn test_unknown_language_rejected() {
    assert!(parse_config("[translation]\ntarget = \"xx\"\n").is_err());
    assert!("XX".parse::<Language>().is_err());
    assert_eq!(" RO ".parse::<Language>().unwrap(), Language::Romanian);
}

#[test]
fn test_generated_config_round_trips() {
    let content = toml::to_string_pretty(&Config::default()).unwrap();
    let config = parse_config(&content).unwrap();
    assert_eq!(config.model.base_url, Config::default().model.base_url);
    assert_eq!(config.network.connectivity, Connectivity::Unmetered);
}

#[test]
fn test_log_level_mapping() {
    let cases = [
        ("DEBUG", "debug"),
        ("INFO", "info"),
        ("warn", "warn"),
        ("ERROR", "error"),
        ("TRACE", "warn"),
        ("", "warn"),
    ];

    for (level, expected) in cases {
        let logging = Logging {
            level: level.to_string(),
            ..Logging::default()
        };
        assert_eq!(logging.filter_directive(), expected, "level {:?}", level);
    }
}

#[tokio::test]
async fn test_app_state_shares_one_manager() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.model.dir = Some(dir.path().display().to_string());

    let state = AppState::new(config).unwrap();
    let first = state.manager();
    let second = state.clone().manager();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(!first.is_ready());
    assert_eq!(state.engine.store().root(), dir.path());
}

#[test]
fn test_app_state_rejects_same_language_pair() {
    let mut config = Config::default();
    config.translation.target = Language::English;

    assert!(AppState::new(config).is_err());
}
