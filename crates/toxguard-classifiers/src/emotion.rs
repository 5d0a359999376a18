//! Emotion detection placeholder
//!
//! No emotion model is shipped yet. Every text is reported as `neutral` with
//! a zero score, and the health probe reports the model as unavailable.

use toxguard_core::EmotionPrediction;

#[derive(Debug, Clone, Copy, Default)]
pub struct EmotionPredictor;

impl EmotionPredictor {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(&self, _text: &str) -> EmotionPrediction {
        EmotionPrediction::neutral()
    }

    pub fn is_loaded(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toxguard_core::Emotion;

    #[test]
    fn test_always_neutral() {
        let predictor = EmotionPredictor::new();

        for text in ["", "I am so happy today!", "I hate everything"] {
            let prediction = predictor.predict(text);
            assert_eq!(prediction.emotion, Emotion::Neutral);
            assert_eq!(prediction.score, 0.0);
        }
        assert!(!predictor.is_loaded());
    }
}
