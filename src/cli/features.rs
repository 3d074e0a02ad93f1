//! Feature schema command

use anyhow::Result;

use super::build_service;
use crate::config::ServiceConfig;

/// Print the feature schema of a session's model
pub fn features(config: &ServiceConfig, session: &str) -> Result<()> {
    let schema = build_service(config).feature_schema(session)?;

    println!("Model: {}", schema.model_name);
    if schema.feature_names.is_empty() {
        println!("  No feature schema recorded; records are used in the order given.");
        return Ok(());
    }

    println!("Features ({}):", schema.feature_names.len());
    for name in &schema.feature_names {
        match schema.feature_types.get(name) {
            Some(dtype) => println!("  {} ({})", name, dtype),
            None => println!("  {}", name),
        }
    }
    if !schema.class_labels.is_empty() {
        let labels: Vec<String> = schema.class_labels.iter().map(|l| l.to_string()).collect();
        println!("Classes: {}", labels.join(", "));
    }

    Ok(())
}
