//! Error types for ToxGuard

/// Result type alias using ToxGuard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ToxGuard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tokenizer failed to encode the input text
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Classifier session failed or returned an unexpected shape
    #[error("inference error: {0}")]
    Inference(String),

    /// A model artifact could not be located or loaded
    #[error("artifact load error: {0}")]
    ArtifactLoad(String),

    /// Filesystem/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration parse errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An artifact load exceeded its time budget
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl Error {
    /// Create a new tokenizer error
    pub fn tokenizer(msg: impl Into<String>) -> Self {
        Self::Tokenizer(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new artifact load error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::ArtifactLoad(msg.into())
    }
}
