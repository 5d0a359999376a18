//! Fixed-shape input tensors for the sequence classifier
//!
//! Every text is normalized to exactly [`MAX_LENGTH`] token ids before it
//! reaches the model. Encodings that are too long are hard-truncated (first
//! `MAX_LENGTH` ids kept, no special end token re-inserted); shorter ones are
//! right-padded with [`PAD_TOKEN_ID`]. The attention mask marks the real
//! tokens with `1` as a contiguous prefix.

use crate::classifier::TokenEncoder;
use toxguard_core::Result;

/// Width of every tensor handed to the classifier
pub const MAX_LENGTH: usize = 160;

/// Id written into padding positions
pub const PAD_TOKEN_ID: i64 = 0;

/// The pair of `[1, MAX_LENGTH]` tensors consumed by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTensors {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
}

impl InputTensors {
    /// Pad or truncate an encoding and derive its attention mask
    pub fn from_token_ids(token_ids: &[u32]) -> Self {
        let real_tokens = token_ids.len().min(MAX_LENGTH);

        let mut input_ids: Vec<i64> = token_ids[..real_tokens]
            .iter()
            .map(|&id| i64::from(id))
            .collect();
        input_ids.resize(MAX_LENGTH, PAD_TOKEN_ID);

        let attention_mask = (0..MAX_LENGTH)
            .map(|i| if i < real_tokens { 1 } else { 0 })
            .collect();

        Self {
            input_ids,
            attention_mask,
        }
    }

    pub fn input_ids(&self) -> &[i64] {
        &self.input_ids
    }

    pub fn attention_mask(&self) -> &[i64] {
        &self.attention_mask
    }

    /// Number of real (non-padding) positions
    pub fn real_tokens(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }

    /// Tensor shape as the runtime expects it: one row of `MAX_LENGTH`
    pub fn shape(&self) -> [i64; 2] {
        [1, MAX_LENGTH as i64]
    }

    /// Hand ownership of both buffers to the inference runtime
    pub fn into_parts(self) -> (Vec<i64>, Vec<i64>) {
        (self.input_ids, self.attention_mask)
    }
}

/// Encode `text` into classifier inputs.
///
/// Returns `Ok(None)` when no tokenizer is loaded, so callers can take the
/// degraded path without treating it as a failure.
pub fn build_inputs(tokenizer: Option<&dyn TokenEncoder>, text: &str) -> Result<Option<InputTensors>> {
    let Some(tokenizer) = tokenizer else {
        return Ok(None);
    };

    let token_ids = tokenizer.token_ids(text)?;
    Ok(Some(InputTensors::from_token_ids(&token_ids)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use toxguard_core::Error;

    struct CountingEncoder;

    impl TokenEncoder for CountingEncoder {
        fn token_ids(&self, text: &str) -> Result<Vec<u32>> {
            Ok((1..=text.split_whitespace().count() as u32).collect())
        }
    }

    struct BrokenEncoder;

    impl TokenEncoder for BrokenEncoder {
        fn token_ids(&self, _text: &str) -> Result<Vec<u32>> {
            Err(Error::tokenizer("vocabulary missing"))
        }
    }

    #[test]
    fn test_short_encoding_is_right_padded() {
        let tensors = InputTensors::from_token_ids(&[101, 7, 8, 102]);

        assert_eq!(tensors.input_ids().len(), MAX_LENGTH);
        assert_eq!(&tensors.input_ids()[..4], &[101, 7, 8, 102]);
        assert!(tensors.input_ids()[4..].iter().all(|&id| id == PAD_TOKEN_ID));
        assert_eq!(&tensors.attention_mask()[..5], &[1, 1, 1, 1, 0]);
        assert_eq!(tensors.real_tokens(), 4);
    }

    #[test]
    fn test_long_encoding_keeps_first_ids() {
        let ids: Vec<u32> = (1..=500).collect();
        let tensors = InputTensors::from_token_ids(&ids);

        assert_eq!(tensors.input_ids().len(), MAX_LENGTH);
        assert_eq!(tensors.input_ids()[0], 1);
        assert_eq!(tensors.input_ids()[MAX_LENGTH - 1], MAX_LENGTH as i64);
        assert!(tensors.attention_mask().iter().all(|&m| m == 1));
    }

    #[test]
    fn test_exact_length_encoding_unchanged() {
        let ids: Vec<u32> = (1..=MAX_LENGTH as u32).collect();
        let tensors = InputTensors::from_token_ids(&ids);

        assert_eq!(tensors.real_tokens(), MAX_LENGTH);
        assert_eq!(tensors.input_ids()[MAX_LENGTH - 1], MAX_LENGTH as i64);
    }

    #[test]
    fn test_empty_encoding_is_all_padding() {
        let tensors = InputTensors::from_token_ids(&[]);

        assert_eq!(tensors.input_ids(), &[PAD_TOKEN_ID; MAX_LENGTH][..]);
        assert_eq!(tensors.real_tokens(), 0);
    }

    #[test]
    fn test_shape_is_single_row() {
        let tensors = InputTensors::from_token_ids(&[5]);
        assert_eq!(tensors.shape(), [1, 160]);
    }

    #[test]
    fn test_build_inputs_without_tokenizer() {
        let inputs = build_inputs(None, "anything").unwrap();
        assert!(inputs.is_none());
    }

    #[test]
    fn test_build_inputs_with_tokenizer() {
        let inputs = build_inputs(Some(&CountingEncoder), "one two three")
            .unwrap()
            .unwrap();
        assert_eq!(&inputs.input_ids()[..4], &[1, 2, 3, 0]);
        assert_eq!(inputs.real_tokens(), 3);
    }

    #[test]
    fn test_build_inputs_propagates_tokenizer_error() {
        let err = build_inputs(Some(&BrokenEncoder), "text").unwrap_err();
        assert!(matches!(err, Error::Tokenizer(_)));
    }
}
