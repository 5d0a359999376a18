//! Property-based tests for tensor shaping and score resolution

use proptest::prelude::*;

use toxguard_classifiers::{resolve, softmax, ClassProbabilities, InputTensors, MAX_LENGTH, PAD_TOKEN_ID};
use toxguard_core::ToxicLabel;

// ============================================================================
// Test Strategies
// ============================================================================

fn encoding_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..50_000, 0..(MAX_LENGTH * 3))
}

fn logit_strategy() -> impl Strategy<Value = f32> {
    -50.0f32..50.0
}

// ============================================================================
// Tensor Builder Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Both tensors always have exactly MAX_LENGTH positions
    #[test]
    fn prop_tensor_width_is_fixed(ids in encoding_strategy()) {
        let tensors = InputTensors::from_token_ids(&ids);

        prop_assert_eq!(tensors.input_ids().len(), MAX_LENGTH);
        prop_assert_eq!(tensors.attention_mask().len(), MAX_LENGTH);
    }

    /// The mask is a contiguous prefix of min(len, MAX_LENGTH) ones
    #[test]
    fn prop_mask_is_contiguous_prefix(ids in encoding_strategy()) {
        let tensors = InputTensors::from_token_ids(&ids);
        let expected = ids.len().min(MAX_LENGTH);
        let mask = tensors.attention_mask();

        prop_assert_eq!(tensors.real_tokens(), expected);
        prop_assert!(mask[..expected].iter().all(|&m| m == 1));
        prop_assert!(mask[expected..].iter().all(|&m| m == 0));
    }

    /// Real positions keep their ids in order, the rest is padding
    #[test]
    fn prop_ids_are_prefix_then_padding(ids in encoding_strategy()) {
        let tensors = InputTensors::from_token_ids(&ids);
        let kept = ids.len().min(MAX_LENGTH);

        for (i, &id) in tensors.input_ids()[..kept].iter().enumerate() {
            prop_assert_eq!(id, i64::from(ids[i]));
        }
        prop_assert!(tensors.input_ids()[kept..].iter().all(|&id| id == PAD_TOKEN_ID));
    }
}

// ============================================================================
// Score Resolver Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Probabilities form a distribution over the two classes
    #[test]
    fn prop_probabilities_sum_to_one(clean in logit_strategy(), toxic in logit_strategy()) {
        let probs = ClassProbabilities::from_logits(&[clean, toxic]).unwrap();

        prop_assert!((0.0..=1.0).contains(&probs.clean));
        prop_assert!((0.0..=1.0).contains(&probs.toxic));
        prop_assert!((probs.clean + probs.toxic - 1.0).abs() < 1e-6);
    }

    /// The reported score is the toxic probability, whichever class wins
    #[test]
    fn prop_score_is_toxic_probability(clean in logit_strategy(), toxic in logit_strategy()) {
        let probs = softmax(&[clean, toxic]);
        let prediction = resolve(&[clean, toxic]).unwrap();

        prop_assert_eq!(prediction.toxic_score, probs[1]);
        prop_assert_eq!(prediction.is_toxic, prediction.toxic_type == ToxicLabel::Toxic);
        prop_assert_eq!(prediction.is_toxic, probs[1] > probs[0]);
    }

    /// Shifting both logits by a constant does not change the decision
    #[test]
    fn prop_resolution_is_shift_invariant(
        clean in logit_strategy(),
        toxic in logit_strategy(),
        shift in -20.0f32..20.0,
    ) {
        let base = resolve(&[clean, toxic]).unwrap();
        let shifted = resolve(&[clean + shift, toxic + shift]).unwrap();

        prop_assert!((base.toxic_score - shifted.toxic_score).abs() < 1e-4);
    }
}
