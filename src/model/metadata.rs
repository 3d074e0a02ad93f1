//! Training-time metadata stored next to the model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::frame::Scalar;

/// Metadata document written by training
///
/// Every key is optional; absent keys take the same defaults training tools
/// assume when reading the document back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Input columns in training order
    #[serde(default)]
    pub feature_names: Vec<String>,

    /// Column name to dtype descriptor (e.g. "float64", "object")
    #[serde(default)]
    pub feature_types: BTreeMap<String, String>,

    /// Human labels indexed by encoded class id
    #[serde(default)]
    pub class_labels: Vec<Scalar>,

    #[serde(default = "default_model_name")]
    pub model_name: String,
}

fn default_model_name() -> String {
    "Unknown".to_string()
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            feature_names: Vec::new(),
            feature_types: BTreeMap::new(),
            class_labels: Vec::new(),
            model_name: default_model_name(),
        }
    }
}

impl ModelMetadata {
    /// Bounded label lookup for a raw prediction
    ///
    /// Numeric predictions index `class_labels`; anything else, or an index
    /// outside the list, falls back to the prediction's string form.
    pub fn label_for(&self, prediction: &Scalar) -> String {
        if self.class_labels.is_empty() || !prediction.is_numeric() {
            return prediction.to_string();
        }
        prediction
            .as_index()
            .and_then(|i| self.class_labels.get(i))
            .map(|label| label.to_string())
            .unwrap_or_else(|| prediction.to_string())
    }

    pub fn schema(&self) -> FeatureSchema {
        FeatureSchema {
            feature_names: self.feature_names.clone(),
            feature_types: self.feature_types.clone(),
            class_labels: self.class_labels.clone(),
            model_name: self.model_name.clone(),
        }
    }
}

/// Read-only projection of the metadata describing the expected input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSchema {
    pub feature_names: Vec<String>,
    pub feature_types: BTreeMap<String, String>,
    pub class_labels: Vec<Scalar>,
    pub model_name: String,
}
