//! Translation manager: the service the keyboard talks to.
//!
//! It owns one translator client for a fixed language pair. `init` kicks
//! off a conditional model download. Translation requests are forwarded to
//! the client once the model is ready. Callers always get an answer: on any
//! failure (or before the model is ready) they receive their own text back.

use crate::domain::model::{
    DownloadConditions, ModelPhase, Outcome, Translation, TranslatorOptions,
};
use crate::domain::traits::{OnTranslationResult, TranslationEngine, Translator};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

pub struct TranslationManager {
    engine: Arc<dyn TranslationEngine>,
    options: TranslatorOptions,
    conditions: DownloadConditions,
    translator: RwLock<Option<Arc<dyn Translator>>>,
    status: Arc<Status>,
}

/// State written by download completions
///
/// Relaxed atomics only: concurrent `init` calls race on these with
/// last-writer-wins, same as the readiness flag they model.
#[derive(Default)]
struct Status {
    ready: AtomicBool,
    phase: AtomicU8,
    last_error: Mutex<Option<String>>,
}

impl Status {
    fn set_phase(&self, phase: ModelPhase) {
        self.phase.store(phase.as_u8(), Ordering::Relaxed);
    }

    fn record_error(&self, message: Option<String>) {
        let mut guard = self.last_error.lock().unwrap_or_else(|e| e.into_inner());
        *guard = message;
    }
}

/// What a request resolves to before any engine work
enum Dispatch {
    Immediate(Translation),
    Engine(Arc<dyn Translator>, String),
}

impl TranslationManager {
    pub fn new(
        engine: Arc<dyn TranslationEngine>,
        options: TranslatorOptions,
        conditions: DownloadConditions,
    ) -> Self {
        Self {
            engine,
            options,
            conditions,
            translator: RwLock::new(None),
            status: Arc::new(Status::default()),
        }
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    pub fn conditions(&self) -> &DownloadConditions {
        &self.conditions
    }

    pub fn is_ready(&self) -> bool {
        self.status.ready.load(Ordering::Relaxed)
    }

    pub fn phase(&self) -> ModelPhase {
        ModelPhase::from_u8(self.status.phase.load(Ordering::Relaxed))
    }

    /// Message of the most recent failed download, if any
    pub fn last_error(&self) -> Option<String> {
        self.status
            .last_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Current client, if `init` has been called
    pub fn translator(&self) -> Option<Arc<dyn Translator>> {
        self.translator
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Build a fresh client and start the conditional model download
    ///
    /// Returns immediately. The readiness flag is only updated when the
    /// download settles, by exactly one of the success or failure paths.
    /// Must be called from within a Tokio runtime.
    pub fn init(&self) -> JoinHandle<()> {
        let translator = self.engine.client(&self.options);
        *self.translator.write().unwrap_or_else(|e| e.into_inner()) = Some(translator.clone());
        self.status.set_phase(ModelPhase::Downloading);

        let status = self.status.clone();
        let conditions = self.conditions;
        let pair = self.options.pair_id();

        tokio::spawn(async move {
            match translator.download_model_if_needed(&conditions).await {
                Ok(()) => {
                    status.ready.store(true, Ordering::Relaxed);
                    status.record_error(None);
                    status.set_phase(ModelPhase::Ready);
                    debug!(%pair, "Model downloaded successfully or already present");
                }
                Err(e) => {
                    status.ready.store(false, Ordering::Relaxed);
                    status.record_error(Some(e.to_string()));
                    status.set_phase(ModelPhase::Failed);
                    error!(%pair, error = %e, "Model download failed");
                }
            }
        })
    }

    /// Translate `text`, delivering the result to `listener`
    ///
    /// Empty input and a not-ready model are answered synchronously (the
    /// listener has already run when this returns `None`). Otherwise the
    /// engine call runs on a spawned task whose handle is returned.
    pub fn translate_text<L>(&self, text: Option<&str>, listener: Option<L>) -> Option<JoinHandle<()>>
    where
        L: OnTranslationResult,
    {
        match self.dispatch(text) {
            Dispatch::Immediate(result) => {
                notify(listener, result.text);
                None
            }
            Dispatch::Engine(translator, original) => Some(tokio::spawn(async move {
                let result = run(translator, original).await;
                notify(listener, result.text);
            })),
        }
    }

    /// Async form of [`translate_text`](Self::translate_text)
    ///
    /// Always resolves; failures come back as the original text with
    /// [`Outcome::Fallback`].
    pub async fn translate(&self, text: &str) -> Translation {
        match self.dispatch(Some(text)) {
            Dispatch::Immediate(result) => result,
            Dispatch::Engine(translator, original) => run(translator, original).await,
        }
    }

    fn dispatch(&self, text: Option<&str>) -> Dispatch {
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => return Dispatch::Immediate(Translation::new(String::new(), Outcome::Empty)),
        };

        let ready = self.is_ready();
        match self.translator() {
            Some(translator) if ready => Dispatch::Engine(translator, text.to_string()),
            _ => {
                warn!(is_ready = ready, "Translator not ready");
                Dispatch::Immediate(Translation::new(text, Outcome::NotReady))
            }
        }
    }
}

async fn run(translator: Arc<dyn Translator>, original: String) -> Translation {
    match translator.translate(&original).await {
        Ok(translated) => Translation::new(translated, Outcome::Translated),
        Err(e) => {
            error!(error = %e, "Translation failed");
            Translation::new(original, Outcome::Fallback)
        }
    }
}

fn notify<L: OnTranslationResult>(listener: Option<L>, text: String) {
    if let Some(listener) = listener {
        listener.on_result(text);
    }
}
