//! Toxicity prediction over the loaded ONNX classifier
//!
//! `predict` never fails. When the model is not ready, or anything goes
//! wrong between tokenization and score resolution, the result is the
//! clean fallback with `used_fallback` set.

use crate::model_loader::{ModelArtifacts, ModelLifecycle, ModelState};
use crate::scoring;
use crate::tensor::build_inputs;
use std::sync::Arc;
use std::time::Instant;
use toxguard_core::{Error, Result, ToxicityPrediction};
use tracing::{debug, warn};

/// Entry point for toxicity predictions
#[derive(Debug, Clone)]
pub struct ToxicityPredictor {
    lifecycle: Arc<ModelLifecycle>,
}

impl ToxicityPredictor {
    pub fn new(lifecycle: Arc<ModelLifecycle>) -> Self {
        Self { lifecycle }
    }

    pub fn lifecycle(&self) -> &ModelLifecycle {
        &self.lifecycle
    }

    /// Whether predictions currently come from the live model
    pub fn is_ready(&self) -> bool {
        self.lifecycle.ready()
    }

    /// Classify one text
    pub fn predict(&self, text: &str) -> ToxicityPrediction {
        let artifacts = match (self.lifecycle.state(), self.lifecycle.artifacts()) {
            (ModelState::Ready, Some(artifacts)) => artifacts,
            (state, _) => {
                debug!(state = %state, "Toxicity model not ready; returning clean");
                metrics::counter!("toxguard_predictions_total", "outcome" => "fallback")
                    .increment(1);
                return ToxicityPrediction::fallback();
            }
        };

        let start = Instant::now();
        match run_inference(artifacts, text) {
            Ok(prediction) => {
                metrics::counter!("toxguard_predictions_total", "outcome" => "live").increment(1);
                metrics::histogram!("toxguard_inference_latency_us")
                    .record(start.elapsed().as_micros() as f64);
                prediction
            }
            Err(e) => {
                warn!(error = %e, "Error predicting toxicity; returning clean");
                metrics::counter!("toxguard_predictions_total", "outcome" => "fallback")
                    .increment(1);
                ToxicityPrediction::fallback()
            }
        }
    }

    /// Classify each text independently, preserving input order
    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<ToxicityPrediction> {
        texts.iter().map(|text| self.predict(text.as_ref())).collect()
    }
}

fn run_inference(artifacts: &ModelArtifacts, text: &str) -> Result<ToxicityPrediction> {
    let classifier = artifacts
        .classifier()
        .ok_or_else(|| Error::inference("classifier not loaded"))?;
    let inputs = build_inputs(artifacts.tokenizer(), text)?
        .ok_or_else(|| Error::inference("tokenizer not loaded"))?;

    let logits = classifier.logits(inputs)?;
    scoring::resolve(&logits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{SequenceClassifier, TokenEncoder};
    use crate::tensor::{InputTensors, MAX_LENGTH};
    use toxguard_core::ToxicLabel;

    struct ByteEncoder;

    impl TokenEncoder for ByteEncoder {
        fn token_ids(&self, text: &str) -> Result<Vec<u32>> {
            Ok(text.bytes().map(u32::from).collect())
        }
    }

    /// Returns fixed logits and checks the tensor contract on every call
    struct FixedLogits(Vec<f32>);

    impl SequenceClassifier for FixedLogits {
        fn logits(&self, inputs: InputTensors) -> Result<Vec<f32>> {
            assert_eq!(inputs.input_ids().len(), MAX_LENGTH);
            assert_eq!(inputs.attention_mask().len(), MAX_LENGTH);
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn predictor_with(logits: Vec<f32>) -> ToxicityPredictor {
        let lifecycle = ModelLifecycle::with_artifacts(ModelArtifacts::complete(
            Arc::new(ByteEncoder),
            Arc::new(FixedLogits(logits)),
        ));
        ToxicityPredictor::new(Arc::new(lifecycle))
    }

    #[test]
    fn test_live_prediction() {
        let predictor = predictor_with(vec![0.1, 3.0]);
        let prediction = predictor.predict("you are terrible");

        assert!(prediction.is_toxic);
        assert_eq!(prediction.toxic_type, ToxicLabel::Toxic);
        assert!(!prediction.used_fallback);
    }

    #[test]
    fn test_uninitialized_returns_fallback() {
        let predictor = ToxicityPredictor::new(Arc::new(ModelLifecycle::new()));
        assert_eq!(predictor.predict("anything"), ToxicityPrediction::fallback());
    }

    #[test]
    fn test_degraded_returns_fallback() {
        let lifecycle = ModelLifecycle::with_artifacts(ModelArtifacts::new(
            Some(Arc::new(ByteEncoder)),
            None,
        ));
        let predictor = ToxicityPredictor::new(Arc::new(lifecycle));

        let long_text = "x".repeat(10_000);
        for text in ["", "hello", long_text.as_str()] {
            let prediction = predictor.predict(text);
            assert!(!prediction.is_toxic);
            assert_eq!(prediction.toxic_score, 0.0);
            assert_eq!(prediction.toxic_type, ToxicLabel::Clean);
            assert!(prediction.used_fallback);
        }
    }

    #[test]
    fn test_malformed_logits_fall_back() {
        let predictor = predictor_with(vec![0.5, 0.2, 0.9]);
        assert!(predictor.predict("text").used_fallback);
    }

    #[test]
    fn test_batch_keeps_order() {
        let predictor = predictor_with(vec![2.0, 0.5]);
        let results = predictor.predict_batch(&["a", "b", "c"]);

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| !r.used_fallback));
    }
}
