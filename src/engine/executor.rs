//! Inference executor
//!
//! Runs a loaded model on a prepared row and shapes the answer for callers.

use serde::{Deserialize, Serialize};

use crate::error::{PredictError, Result};
use crate::frame::{FeatureRow, Scalar};
use crate::model::{ModelArtifact, ModelMetadata};

/// Structured answer for a single prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: Scalar,
    pub predicted_label: String,
    pub confidence: Option<f64>,
    pub probabilities: Option<Vec<f64>>,
    pub model_name: String,
    pub class_labels: Vec<Scalar>,
}

/// Inference executor
///
/// Borrows a model and its metadata for the duration of one request.
pub struct Executor<'a> {
    model: &'a ModelArtifact,
    metadata: &'a ModelMetadata,
}

impl<'a> Executor<'a> {
    pub fn new(model: &'a ModelArtifact, metadata: &'a ModelMetadata) -> Self {
        Self { model, metadata }
    }

    /// Predict one row
    ///
    /// The point prediction is mandatory. Probabilities are best-effort and
    /// are omitted if the model lacks the capability or it fails.
    pub fn run(&self, row: &FeatureRow) -> Result<PredictionResult> {
        let predictor = self.model.predictor();
        let prediction = predictor
            .predict(row)
            .map(portable)
            .map_err(|e| PredictError::PredictionFailure(e.to_string()))?;

        let probabilities = predictor.as_probabilistic().and_then(|p| {
            match p.predict_proba(row) {
                Ok(proba) if proba.is_empty() => None,
                Ok(proba) if proba.iter().any(|v| !v.is_finite()) => {
                    tracing::warn!("model returned non-finite probabilities, omitting them");
                    None
                }
                Ok(proba) => {
                    let labels = self.metadata.class_labels.len();
                    if labels > 0 && labels != p.classes().len() {
                        tracing::warn!(
                            classes = p.classes().len(),
                            class_labels = labels,
                            "model classes do not match metadata class labels"
                        );
                    }
                    Some(proba)
                }
                Err(e) => {
                    tracing::debug!(error = %e, "probabilities unavailable");
                    None
                }
            }
        });

        let confidence = probabilities
            .as_ref()
            .and_then(|proba| proba.iter().cloned().reduce(f64::max));

        Ok(PredictionResult {
            predicted_label: self.metadata.label_for(&prediction),
            prediction,
            confidence,
            probabilities,
            model_name: self.metadata.model_name.clone(),
            class_labels: self.metadata.class_labels.clone(),
        })
    }
}

/// Normalize a raw prediction to a value every caller can represent
fn portable(value: Scalar) -> Scalar {
    match value {
        Scalar::Null => Scalar::Text("null".to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DecisionTree, LinearRegression, LogisticRegression, TreeNode, TreeTask};

    fn cat_dog_metadata() -> ModelMetadata {
        ModelMetadata {
            feature_names: vec!["x".into()],
            class_labels: vec!["cat".into(), "dog".into()],
            model_name: "LogisticRegression".into(),
            ..Default::default()
        }
    }

    fn classifier() -> ModelArtifact {
        ModelArtifact::LogisticRegression(LogisticRegression {
            classes: vec![Scalar::Int(0), Scalar::Int(1)],
            coefficients: vec![vec![2.0]],
            intercepts: vec![0.0],
        })
    }

    #[test]
    fn test_label_and_confidence() {
        let model = classifier();
        let metadata = cat_dog_metadata();
        let result = Executor::new(&model, &metadata)
            .run(&FeatureRow::positional(vec![1.5]))
            .unwrap();

        assert_eq!(result.prediction, Scalar::Int(1));
        assert_eq!(result.predicted_label, "dog");
        let proba = result.probabilities.unwrap();
        assert_eq!(proba.len(), result.class_labels.len());
        let max = proba.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(result.confidence, Some(max));
        assert_eq!(result.model_name, "LogisticRegression");
    }

    #[test]
    fn test_regression_without_probabilities() {
        let model = ModelArtifact::LinearRegression(LinearRegression {
            coefficients: vec![1.0],
            intercept: 1.0,
        });
        let metadata = ModelMetadata::default();
        let result = Executor::new(&model, &metadata)
            .run(&FeatureRow::positional(vec![2.0]))
            .unwrap();
        assert_eq!(result.prediction, Scalar::Float(3.0));
        assert_eq!(result.predicted_label, "3");
        assert_eq!(result.confidence, None);
        assert_eq!(result.probabilities, None);
        assert_eq!(result.model_name, "Unknown");
    }

    #[test]
    fn test_string_classes_pass_through() {
        let model = ModelArtifact::DecisionTree(DecisionTree {
            task: TreeTask::Classification {
                classes: vec!["no".into(), "yes".into()],
            },
            n_features: 1,
            nodes: vec![TreeNode::Leaf {
                value: vec![1.0, 3.0],
            }],
        });
        let metadata = ModelMetadata::default();
        let result = Executor::new(&model, &metadata)
            .run(&FeatureRow::positional(vec![0.0]))
            .unwrap();
        assert_eq!(result.prediction, Scalar::Text("yes".into()));
        assert_eq!(result.predicted_label, "yes");
        assert_eq!(result.confidence, Some(0.75));
    }

    #[test]
    fn test_missing_value_is_prediction_failure() {
        let model = classifier();
        let metadata = cat_dog_metadata();
        let row = FeatureRow::new(vec!["x".into()], vec![Scalar::Null]).unwrap();
        let err = Executor::new(&model, &metadata).run(&row).unwrap_err();
        match err {
            PredictError::PredictionFailure(message) => assert!(message.contains("NaN")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_predict_failure_is_fatal() {
        let model = classifier();
        let metadata = cat_dog_metadata();
        let err = Executor::new(&model, &metadata)
            .run(&FeatureRow::positional(vec![1.0, 2.0]))
            .unwrap_err();
        assert!(matches!(err, PredictError::PredictionFailure(_)));
    }
}
