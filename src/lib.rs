//! On-device translation for keyboard input.
//!
//! [`TranslationManager`] wraps a [`Translator`] client for one language
//! pair: it downloads the offline model when the network allows, then
//! forwards translation requests, falling back to the original text whenever
//! the model is unavailable or the engine fails.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod state;

pub use application::manager::TranslationManager;
pub use domain::error::TranslateError;
pub use domain::model::{
    Connectivity, DownloadConditions, Language, ModelPhase, Outcome, Translation,
    TranslatorOptions,
};
pub use domain::traits::{NetworkMonitor, OnTranslationResult, TranslationEngine, Translator};
pub use infrastructure::engine::OfflineEngine;
pub use state::AppState;
