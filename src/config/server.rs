//! HTTP server settings

use std::time::Duration;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Whole-request deadline, pipeline included
    pub request_timeout_secs: u64,

    /// Largest accepted request body; a prediction body is a single record
    pub max_body_bytes: usize,

    /// Emit a span per HTTP request
    pub request_logging: bool,

    pub cors: CorsConfig,
}

/// Cross-origin access for browser front ends
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,

    /// Allowed origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
            request_logging: true,
            cors: CorsConfig::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Socket address string to bind
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject settings that would make every request fail
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            bail!("server.request_timeout_secs must be greater than zero");
        }
        if self.max_body_bytes == 0 {
            bail!("server.max_body_bytes must be greater than zero");
        }
        Ok(())
    }
}
