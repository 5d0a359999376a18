//! ONNX Runtime backed sequence classifier

use crate::classifier::SequenceClassifier;
use crate::tensor::InputTensors;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use parking_lot::Mutex;
use std::path::Path;
use toxguard_core::{Error, Result};

/// Input names the exported classifier graph declares
pub const INPUT_IDS: &str = "input_ids";
pub const ATTENTION_MASK: &str = "attention_mask";

/// Binary sequence classifier exported to ONNX.
///
/// `Session::run` needs `&mut Session`, so every inference call goes
/// through one mutex. Predictions are short and bounded by the fixed input
/// width, which keeps contention low.
pub struct OnnxClassifier {
    name: String,
    session: Mutex<Session>,
}

impl OnnxClassifier {
    /// Load a model file, optionally pinning the intra-op thread count
    pub fn load(model_path: &Path, intra_threads: Option<usize>) -> Result<Self> {
        if !model_path.exists() {
            return Err(Error::artifact(format!(
                "Model not found at: {}",
                model_path.display()
            )));
        }

        let mut builder = Session::builder()
            .map_err(|e| Error::artifact(format!("Failed to create ONNX session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::artifact(format!("Failed to set optimization level: {}", e)))?;

        if let Some(threads) = intra_threads {
            builder = builder
                .with_intra_threads(threads)
                .map_err(|e| Error::artifact(format!("Failed to set intra threads: {}", e)))?;
        }

        let session = builder.commit_from_file(model_path).map_err(|e| {
            Error::artifact(format!(
                "Failed to load ONNX model from {}: {}",
                model_path.display(),
                e
            ))
        })?;

        let name = model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx-classifier")
            .to_string();

        Ok(Self {
            name,
            session: Mutex::new(session),
        })
    }
}

impl SequenceClassifier for OnnxClassifier {
    fn logits(&self, inputs: InputTensors) -> Result<Vec<f32>> {
        let shape = inputs.shape();
        let (input_ids, attention_mask) = inputs.into_parts();

        let input_ids = Tensor::from_array((shape, input_ids))
            .map_err(|e| Error::inference(format!("Failed to create input_ids tensor: {}", e)))?;
        let attention_mask = Tensor::from_array((shape, attention_mask)).map_err(|e| {
            Error::inference(format!("Failed to create attention_mask tensor: {}", e))
        })?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs! {
                INPUT_IDS => input_ids,
                ATTENTION_MASK => attention_mask
            })
            .map_err(|e| Error::inference(format!("ONNX inference failed: {}", e)))?;

        let (_, logits) = outputs
            .iter()
            .next()
            .ok_or_else(|| Error::inference("Model produced no outputs"))?;
        let (out_shape, data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::inference(format!("Failed to extract logits: {}", e)))?;

        first_row(out_shape, data)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// First row of a `[batch, classes]` output; the row width is the last dimension
fn first_row(shape: &[i64], data: &[f32]) -> Result<Vec<f32>> {
    let row_width = shape
        .last()
        .copied()
        .and_then(|w| usize::try_from(w).ok())
        .ok_or_else(|| Error::inference(format!("Unexpected output shape: {:?}", shape)))?;

    data.get(..row_width).map(<[f32]>::to_vec).ok_or_else(|| {
        Error::inference(format!(
            "Output holds {} values, expected at least {}",
            data.len(),
            row_width
        ))
    })
}
