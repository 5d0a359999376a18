//! Core types for ToxGuard

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places kept in scores returned to clients
pub const SCORE_DECIMALS: i32 = 4;

/// Round a probability to [`SCORE_DECIMALS`] places for the wire.
///
/// The value is widened to `f64` before rounding so that the serialized
/// number carries no `f32` representation noise (`0.1824`, not
/// `0.18240000307559967`).
pub fn round_score(score: f32) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (f64::from(score) * factor).round() / factor
}

/// Binary label of the toxicity classifier.
///
/// Class index 0 is `clean`, class index 1 is `toxic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToxicLabel {
    Clean,
    Toxic,
}

impl ToxicLabel {
    /// Map a class index to its label
    pub fn from_class(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Clean),
            1 => Some(Self::Toxic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Toxic => "toxic",
        }
    }
}

impl fmt::Display for ToxicLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single toxicity prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToxicityPrediction {
    /// Whether the classifier picked the toxic class
    pub is_toxic: bool,

    /// Probability of the toxic class (0.0-1.0), whichever class won
    pub toxic_score: f32,

    /// Label of the winning class
    pub toxic_type: ToxicLabel,

    /// Set when no live inference happened and the safe default was returned
    pub used_fallback: bool,
}

impl ToxicityPrediction {
    /// Build a prediction from live classifier output
    pub fn from_model(toxic_type: ToxicLabel, toxic_score: f32) -> Self {
        Self {
            is_toxic: toxic_type == ToxicLabel::Toxic,
            toxic_score,
            toxic_type,
            used_fallback: false,
        }
    }

    /// The fail-safe result: clean with a zero score
    pub fn fallback() -> Self {
        Self {
            is_toxic: false,
            toxic_score: 0.0,
            toxic_type: ToxicLabel::Clean,
            used_fallback: true,
        }
    }
}

/// Emotion labels understood by the (future) emotion model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Trust,
    Neutral,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Sadness => "sadness",
            Self::Anger => "anger",
            Self::Fear => "fear",
            Self::Surprise => "surprise",
            Self::Disgust => "disgust",
            Self::Trust => "trust",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an emotion prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionPrediction {
    pub emotion: Emotion,
    pub score: f32,
}

impl EmotionPrediction {
    /// Neutral with a zero score
    pub fn neutral() -> Self {
        Self {
            emotion: Emotion::Neutral,
            score: 0.0,
        }
    }
}

/// Per-text record returned by the analysis API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub is_toxic: bool,
    pub toxic_score: f64,
    pub toxic_type: ToxicLabel,
    pub emotion: Emotion,
    pub emotion_score: f64,
}

impl AnalysisResult {
    /// Combine both predictions, rounding scores for the wire
    pub fn new(toxicity: &ToxicityPrediction, emotion: &EmotionPrediction) -> Self {
        Self {
            is_toxic: toxicity.is_toxic,
            toxic_score: round_score(toxicity.toxic_score),
            toxic_type: toxicity.toxic_type,
            emotion: emotion.emotion,
            emotion_score: round_score(emotion.score),
        }
    }
}

/// Which models are currently able to serve live predictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub toxic: bool,
    pub emotion: bool,
}
