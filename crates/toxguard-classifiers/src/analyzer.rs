//! Combined toxicity and emotion analysis

use crate::emotion::EmotionPredictor;
use crate::model_loader::ModelLifecycle;
use crate::toxicity::ToxicityPredictor;
use std::sync::Arc;
use toxguard_core::{AnalysisResult, ModelStatus};
use tracing::debug;

/// Characters of input text echoed into debug logs
const LOG_PREVIEW_CHARS: usize = 100;

/// Produces the per-text records served by the analysis API
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    toxicity: ToxicityPredictor,
    emotion: EmotionPredictor,
}

impl TextAnalyzer {
    pub fn new(lifecycle: Arc<ModelLifecycle>) -> Self {
        Self {
            toxicity: ToxicityPredictor::new(lifecycle),
            emotion: EmotionPredictor::new(),
        }
    }

    /// Analyze one text
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let toxicity = self.toxicity.predict(text);
        let emotion = self.emotion.predict(text);
        let result = AnalysisResult::new(&toxicity, &emotion);

        debug!(
            text = preview(text),
            is_toxic = result.is_toxic,
            toxic_score = result.toxic_score,
            toxic_type = %result.toxic_type,
            fallback = toxicity.used_fallback,
            "Analyzed text"
        );
        result
    }

    /// Analyze each text independently, preserving input order
    pub fn analyze_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<AnalysisResult> {
        texts.iter().map(|text| self.analyze(text.as_ref())).collect()
    }

    pub fn model_status(&self) -> ModelStatus {
        ModelStatus {
            toxic: self.toxicity.is_ready(),
            emotion: self.emotion.is_loaded(),
        }
    }
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
