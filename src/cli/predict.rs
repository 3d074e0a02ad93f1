//! One-shot prediction command

use std::path::Path;

use anyhow::{Context, Result};

use super::build_service;
use crate::config::ServiceConfig;
use crate::frame::FeatureRecord;

/// Predict one record and print the result as JSON
pub fn predict(config: &ServiceConfig, session: &str, features: &str) -> Result<()> {
    let record = parse_features(features)?;
    if record.is_empty() {
        eprintln!("warning: no features given");
    }
    let service = build_service(config);

    let outcome = service.predict(session, &record)?;
    for warning in outcome.report.warnings() {
        eprintln!("warning: {}", warning);
    }
    println!("{}", serde_json::to_string_pretty(&outcome.result)?);

    Ok(())
}

/// Inline JSON, or `@path` to read it from a file
fn parse_features(arg: &str) -> Result<FeatureRecord> {
    let (source, text) = match arg.strip_prefix('@') {
        Some(path) => {
            let text = std::fs::read_to_string(Path::new(path))
                .with_context(|| format!("failed to read features from {}", path))?;
            (path, text)
        }
        None => ("--features", arg.to_string()),
    };
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON object of feature values", source))
}
