//! Logit to decision mapping for the binary toxicity classifier

use toxguard_core::{Error, Result, ToxicLabel, ToxicityPrediction};

/// Number of classes the toxicity head emits (`clean`, `toxic`)
pub const NUM_CLASSES: usize = 2;

/// Softmax output over `{clean, toxic}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    pub clean: f32,
    pub toxic: f32,
}

impl ClassProbabilities {
    /// Convert a `[clean, toxic]` logit pair
    pub fn from_logits(logits: &[f32]) -> Result<Self> {
        if logits.len() != NUM_CLASSES {
            return Err(Error::inference(format!(
                "expected {} logits, got {}",
                NUM_CLASSES,
                logits.len()
            )));
        }
        if logits.iter().any(|l| !l.is_finite()) {
            return Err(Error::inference(format!("non-finite logits: {:?}", logits)));
        }

        let probs = softmax(logits);
        Ok(Self {
            clean: probs[0],
            toxic: probs[1],
        })
    }

    /// Winning class; the lower index wins an exact tie
    pub fn predicted_class(&self) -> ToxicLabel {
        if self.toxic > self.clean {
            ToxicLabel::Toxic
        } else {
            ToxicLabel::Clean
        }
    }

    pub fn as_array(&self) -> [f32; NUM_CLASSES] {
        [self.clean, self.toxic]
    }
}

/// Softmax with max subtraction, so large logits do not overflow `exp`
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value; the first one wins ties
pub fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, best_v)) if v <= best_v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Resolve classifier logits into a prediction.
///
/// `toxic_score` is always the toxic-class probability, also when the clean
/// class wins.
pub fn resolve(logits: &[f32]) -> Result<ToxicityPrediction> {
    let probs = ClassProbabilities::from_logits(logits)?;
    let label = argmax(&probs.as_array())
        .and_then(ToxicLabel::from_class)
        .ok_or_else(|| Error::inference("empty probability distribution"))?;

    Ok(ToxicityPrediction::from_model(label, probs.toxic))
}
