//! Configuration system for tabserve
//!
//! One document with three sections: `server`, `storage` and `inference`.
//! Every field has a default, so an empty file is a valid configuration.

mod inference;
mod server;
mod storage;

pub use inference::{FailurePolicy, InferenceConfig, UnknownFeaturePolicy};
pub use server::{CorsConfig, ServerConfig};
pub use storage::{StorageConfig, SESSIONS_DIR_ENV};

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Tabserve configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server settings (only for `tabserve serve`)
    #[serde(default)]
    pub server: ServerConfig,

    /// Where session artifacts live
    #[serde(default)]
    pub storage: StorageConfig,

    /// Pipeline policies
    #[serde(default)]
    pub inference: InferenceConfig,
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, picking the parser from the file extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yaml" | "yml" => Self::from_yaml(path),
            "json" => Self::from_json(path),
            _ => Err(anyhow!("Unsupported config file format: .{}", ext)),
        }
        .with_context(|| format!("failed to load config from {}", path.display()))
    }

    /// Apply environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(SESSIONS_DIR_ENV) {
            if !dir.is_empty() {
                self.storage.sessions_dir = dir.into();
            }
        }
        self
    }
}
