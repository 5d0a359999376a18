//! Tokenizer and classifier-session traits

use crate::tensor::InputTensors;
use toxguard_core::Result;

/// Maps raw text to token ids.
///
/// Implementations must be read-only: one instance is shared across all
/// concurrent requests.
pub trait TokenEncoder: Send + Sync {
    /// Encode text, including whatever special tokens the tokenizer adds
    fn token_ids(&self, text: &str) -> Result<Vec<u32>>;
}

/// A loaded sequence classifier
pub trait SequenceClassifier: Send + Sync {
    /// Run one forward pass and return the first output row of logits
    fn logits(&self, inputs: InputTensors) -> Result<Vec<f32>>;

    /// Model name for logs
    fn name(&self) -> &str;
}

impl TokenEncoder for tokenizers::Tokenizer {
    fn token_ids(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .encode(text, true)
            .map_err(|e| toxguard_core::Error::tokenizer(format!("Tokenization failed: {}", e)))?;

        Ok(encoding.get_ids().to_vec())
    }
}
