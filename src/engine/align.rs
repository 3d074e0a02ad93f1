//! Feature alignment against the training schema

use crate::config::UnknownFeaturePolicy;
use crate::error::{PredictError, Result};
use crate::frame::{FeatureRecord, FeatureRow};

/// Arrange a caller's record into the column order used during training
///
/// With an empty schema the record's own order is kept. Otherwise every
/// schema column must be present; extra keys are dropped or rejected
/// according to `unknown`.
pub fn align_features(
    record: &FeatureRecord,
    feature_names: &[String],
    unknown: UnknownFeaturePolicy,
) -> Result<FeatureRow> {
    if feature_names.is_empty() {
        return Ok(FeatureRow::from_record(record));
    }

    let missing: Vec<&str> = feature_names
        .iter()
        .map(String::as_str)
        .filter(|name| !record.contains(name))
        .collect();
    if !missing.is_empty() {
        return Err(PredictError::SchemaMismatch(format!(
            "missing required features: {}",
            missing.join(", ")
        )));
    }

    let extra: Vec<&str> = record
        .names()
        .filter(|name| !feature_names.iter().any(|f| f == name))
        .collect();
    if !extra.is_empty() {
        match unknown {
            UnknownFeaturePolicy::Reject => {
                return Err(PredictError::SchemaMismatch(format!(
                    "unknown features: {}",
                    extra.join(", ")
                )));
            }
            UnknownFeaturePolicy::Ignore => {
                tracing::debug!(features = ?extra, "dropping features not in training schema");
            }
        }
    }

    let values = feature_names
        .iter()
        .filter_map(|name| record.get(name).cloned())
        .collect();
    FeatureRow::new(feature_names.to_vec(), values).map_err(PredictError::Internal)
}
