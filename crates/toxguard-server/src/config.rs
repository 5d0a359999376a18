//! Server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use toxguard_classifiers::ClassifierConfig;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Accept cross-origin requests from anywhere
    #[serde(default = "default_true")]
    pub cors_allow_any_origin: bool,

    /// Allowed origins when `cors_allow_any_origin` is off
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Model artifact locations
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Values taken from the command line or environment, applied over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen: Option<String>,
    pub port: Option<u16>,
    pub model_dir: Option<PathBuf>,
    /// Standalone classifier YAML replacing the `classifier` section
    pub classifier_config: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: impl AsRef<Path>, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();

        // Try to load from file, or use defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        if let Some(path) = &overrides.classifier_config {
            config.classifier = ClassifierConfig::from_file(path)?;
        }

        config.apply(overrides);
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(listen) = &overrides.listen {
            self.listen = listen.clone();
        }

        if let Some(port) = overrides.port {
            self.port = port;
        }

        if let Some(model_dir) = &overrides.model_dir {
            self.classifier.model_dir = model_dir.clone();
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.listen, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            cors_allow_any_origin: true,
            cors_origins: Vec::new(),
            classifier: ClassifierConfig::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    6000
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_true() -> bool {
    true
}
