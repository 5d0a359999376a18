//! Model artifact loading and availability state
//!
//! The tokenizer and the classifier are loaded once at startup. A failure to
//! load either one is logged and leaves the lifecycle `Degraded`; it is never
//! returned to the caller. There is no reload: the first transition out of
//! `Uninitialized` is final for the process lifetime.

use crate::classifier::{SequenceClassifier, TokenEncoder};
use crate::config::ClassifierConfig;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use toxguard_core::{Error, Result};
use tracing::{error, info, warn};

/// The loaded tokenizer/classifier pair. Either side may be missing.
#[derive(Clone, Default)]
pub struct ModelArtifacts {
    tokenizer: Option<Arc<dyn TokenEncoder>>,
    classifier: Option<Arc<dyn SequenceClassifier>>,
}

impl ModelArtifacts {
    pub fn new(
        tokenizer: Option<Arc<dyn TokenEncoder>>,
        classifier: Option<Arc<dyn SequenceClassifier>>,
    ) -> Self {
        Self {
            tokenizer,
            classifier,
        }
    }

    /// Both artifacts present
    pub fn complete(tokenizer: Arc<dyn TokenEncoder>, classifier: Arc<dyn SequenceClassifier>) -> Self {
        Self::new(Some(tokenizer), Some(classifier))
    }

    pub fn is_complete(&self) -> bool {
        self.tokenizer.is_some() && self.classifier.is_some()
    }

    pub fn tokenizer(&self) -> Option<&dyn TokenEncoder> {
        self.tokenizer.as_deref()
    }

    pub fn classifier(&self) -> Option<&dyn SequenceClassifier> {
        self.classifier.as_deref()
    }
}

impl fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("tokenizer", &self.tokenizer.is_some())
            .field("classifier", &self.classifier.as_ref().map(|c| c.name()))
            .finish()
    }
}

/// Availability of the toxicity model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    /// Load has not run yet
    Uninitialized,
    /// Tokenizer and classifier both loaded
    Ready,
    /// At least one artifact is missing; predictions fall back to clean
    Degraded,
}

impl ModelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Degraded => "degraded",
        }
    }
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the model artifacts and their one-shot load transition
#[derive(Debug, Default)]
pub struct ModelLifecycle {
    artifacts: OnceLock<ModelArtifacts>,
}

impl ModelLifecycle {
    /// A lifecycle that has not loaded anything yet
    pub fn new() -> Self {
        Self::default()
    }

    /// A lifecycle already holding pre-built artifacts
    pub fn with_artifacts(artifacts: ModelArtifacts) -> Self {
        let lifecycle = Self::new();
        lifecycle.install(artifacts);
        lifecycle
    }

    /// Load both artifacts as configured and transition out of `Uninitialized`.
    ///
    /// Each artifact is attempted independently and bounded by the configured
    /// timeout. Never fails; the returned state tells whether live inference
    /// is available.
    pub async fn load(&self, config: &ClassifierConfig) -> ModelState {
        if self.artifacts.get().is_some() {
            warn!("Model artifacts already loaded; ignoring reload request");
            return self.state();
        }

        let timeout = config.load_timeout();

        let tokenizer_path = config.tokenizer_path();
        let tokenizer = load_artifact("tokenizer", timeout, move || {
            load_tokenizer(&tokenizer_path)
        })
        .await;

        let model_path = config.model_path();
        let intra_threads = config.intra_threads;
        let classifier = load_artifact("classifier", timeout, move || {
            load_classifier(&model_path, intra_threads)
        })
        .await;

        let state = self.install(ModelArtifacts::new(tokenizer, classifier));
        match state {
            ModelState::Ready => info!("Toxicity model ready"),
            _ => warn!("Toxicity model unavailable; continuing in fallback mode"),
        }
        state
    }

    /// Install pre-built artifacts. Only the first call has any effect.
    pub fn install(&self, artifacts: ModelArtifacts) -> ModelState {
        if self.artifacts.set(artifacts).is_err() {
            warn!("Model artifacts already installed; keeping the existing ones");
        }

        let state = self.state();
        metrics::gauge!("toxguard_models_ready").set(if state == ModelState::Ready {
            1.0
        } else {
            0.0
        });
        state
    }

    pub fn state(&self) -> ModelState {
        match self.artifacts.get() {
            None => ModelState::Uninitialized,
            Some(artifacts) if artifacts.is_complete() => ModelState::Ready,
            Some(_) => ModelState::Degraded,
        }
    }

    pub fn ready(&self) -> bool {
        self.state() == ModelState::Ready
    }

    /// Loaded artifacts, `None` until the load transition happened
    pub fn artifacts(&self) -> Option<&ModelArtifacts> {
        self.artifacts.get()
    }
}

/// Load one artifact; any failure is logged and yields `None`
async fn load_artifact<T, F>(name: &'static str, timeout: Duration, loader: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    match run_loader(timeout, loader).await {
        Ok(artifact) => Some(artifact),
        Err(e) => {
            warn!(artifact = name, error = %e, "Artifact unavailable");
            None
        }
    }
}

/// Run a blocking loader off the async runtime, bounded by `timeout`
async fn run_loader<T, F>(timeout: Duration, loader: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(loader)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            error!(error = %e, "Artifact loader panicked");
            Err(Error::artifact(format!("loader task failed: {}", e)))
        }
        Err(_) => Err(Error::Timeout(timeout)),
    }
}

fn load_tokenizer(path: &Path) -> Result<Arc<dyn TokenEncoder>> {
    if !path.exists() {
        return Err(Error::artifact(format!(
            "Tokenizer not found at: {}",
            path.display()
        )));
    }

    let tokenizer = tokenizers::Tokenizer::from_file(path)
        .map_err(|e| Error::artifact(format!("Failed to load tokenizer: {}", e)))?;

    info!("Loaded tokenizer: {}", path.display());
    Ok(Arc::new(tokenizer))
}

#[cfg(feature = "ml-models")]
fn load_classifier(path: &Path, intra_threads: Option<usize>) -> Result<Arc<dyn SequenceClassifier>> {
    let classifier = crate::onnx::OnnxClassifier::load(path, intra_threads)?;

    info!("Loaded toxic model: {}", path.display());
    Ok(Arc::new(classifier))
}

#[cfg(not(feature = "ml-models"))]
fn load_classifier(path: &Path, _intra_threads: Option<usize>) -> Result<Arc<dyn SequenceClassifier>> {
    Err(Error::artifact(format!(
        "Cannot load {}: ONNX inference requires the 'ml-models' feature",
        path.display()
    )))
}
