//! Model export command

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::build_service;
use crate::config::ServiceConfig;

/// Copy a session's raw model artifact to disk
pub fn export(config: &ServiceConfig, session: &str, output: Option<PathBuf>) -> Result<()> {
    let export = build_service(config).export_model(session)?;
    let path = output.unwrap_or_else(|| PathBuf::from(&export.file_name));

    std::fs::write(&path, &export.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "Wrote {} ({} bytes) to {}",
        export.file_name,
        export.bytes.len(),
        path.display()
    );

    Ok(())
}
