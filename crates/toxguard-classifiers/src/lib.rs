//! ToxGuard Classifiers
//!
//! Toxicity detection over a pre-trained binary sequence classifier.
//!
//! The prediction pipeline is:
//! - [`tensor`]: token ids padded/truncated to a fixed width plus attention mask
//! - [`classifier`]: the tokenizer and classifier-session seams
//! - [`onnx`]: ONNX Runtime implementation of the classifier session
//! - [`scoring`]: softmax and label mapping
//! - [`model_loader`]: one-time artifact loading and the `Ready`/`Degraded` state
//! - [`toxicity`]: the never-failing prediction entry point
//!
//! When the model is unavailable every prediction defaults to clean.

pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod emotion;
pub mod model_loader;
#[cfg(feature = "ml-models")]
pub mod onnx;
pub mod scoring;
pub mod tensor;
pub mod toxicity;

pub use analyzer::TextAnalyzer;
pub use classifier::{SequenceClassifier, TokenEncoder};
pub use config::ClassifierConfig;
pub use emotion::EmotionPredictor;
pub use model_loader::{ModelArtifacts, ModelLifecycle, ModelState};
#[cfg(feature = "ml-models")]
pub use onnx::OnnxClassifier;
pub use scoring::{resolve, softmax, ClassProbabilities};
pub use tensor::{build_inputs, InputTensors, MAX_LENGTH, PAD_TOKEN_ID};
pub use toxicity::ToxicityPredictor;
