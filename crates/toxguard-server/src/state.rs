//! Shared application state

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use toxguard_classifiers::{ModelLifecycle, TextAnalyzer};
use tracing::info;

use crate::config::ServerConfig;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Toxicity + emotion analysis over the shared model artifacts
    pub analyzer: Arc<TextAnalyzer>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state around an already loaded (or injected) lifecycle
    pub fn new(
        config: ServerConfig,
        lifecycle: Arc<ModelLifecycle>,
        metrics_handle: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            analyzer: Arc::new(TextAnalyzer::new(lifecycle)),
            metrics_handle,
        }
    }

    /// Load the model artifacts and build state.
    ///
    /// Missing or broken artifacts do not fail startup; the service then
    /// answers every request with the clean fallback.
    pub async fn initialize(config: ServerConfig, metrics_handle: Option<PrometheusHandle>) -> Self {
        info!("Loading models from: {}", config.classifier.model_dir.display());

        let lifecycle = Arc::new(ModelLifecycle::new());
        let state = lifecycle.load(&config.classifier).await;
        info!("Model state: {}", state);

        Self::new(config, lifecycle, metrics_handle)
    }
}
