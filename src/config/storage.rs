//! Session storage settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable overriding the sessions directory
pub const SESSIONS_DIR_ENV: &str = "TABSERVE_SESSIONS_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one subdirectory per session
    #[serde(default = "default_sessions_dir")]
    pub sessions_dir: PathBuf,
}

fn default_sessions_dir() -> PathBuf {
    PathBuf::from("./sessions")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sessions_dir: default_sessions_dir(),
        }
    }
}
