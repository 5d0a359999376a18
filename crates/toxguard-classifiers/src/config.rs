//! Configuration for model artifact loading

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the toxicity artifacts live and how to load them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Directory holding the tokenizer and model files
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Tokenizer file name inside `model_dir`
    #[serde(default = "default_tokenizer_file")]
    pub tokenizer_file: String,

    /// ONNX model file name inside `model_dir`
    #[serde(default = "default_model_file")]
    pub model_file: String,

    /// Upper bound for loading each artifact at startup
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,

    /// ONNX Runtime intra-op threads (runtime default when unset)
    #[serde(default)]
    pub intra_threads: Option<usize>,
}

impl ClassifierConfig {
    /// Config rooted at `model_dir` with default file names
    pub fn from_dir(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> toxguard_core::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir.join(&self.tokenizer_file)
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            tokenizer_file: default_tokenizer_file(),
            model_file: default_model_file(),
            load_timeout_secs: default_load_timeout_secs(),
            intra_threads: None,
        }
    }
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("toxics/v2")
}

fn default_tokenizer_file() -> String {
    "tokenizer.json".to_string()
}

fn default_model_file() -> String {
    "model.onnx".to_string()
}

fn default_load_timeout_secs() -> u64 {
    30
}
