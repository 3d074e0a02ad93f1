//! Inference pipeline policies

use serde::{Deserialize, Serialize};

/// What a preprocessing failure does to the request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log a warning and continue with the untransformed row
    #[default]
    Degrade,
    /// Abort the request
    Fail,
}

/// What to do with request features the model was not trained on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFeaturePolicy {
    #[default]
    Ignore,
    Reject,
}

/// Inference-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Handling of a corrupt chain or a failing encoder/scaler
    #[serde(default)]
    pub transform_failures: FailurePolicy,

    /// Handling of extra keys when the model has a feature schema
    #[serde(default)]
    pub unknown_features: UnknownFeaturePolicy,
}
