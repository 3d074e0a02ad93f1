//! Trained model artifacts and their capabilities
//!
//! A session's model is one of a closed set of families, stored as a tagged
//! serde document. Every family can [`Predictor::predict`]; families that can
//! emit class probabilities also expose [`ProbabilisticPredictor`] through
//! [`Predictor::as_probabilistic`].

mod linear;
mod logistic;
mod metadata;
mod tree;

pub use linear::LinearRegression;
pub use logistic::LogisticRegression;
pub use metadata::{FeatureSchema, ModelMetadata};
pub use tree::{DecisionTree, RandomForest, Tree, TreeNode, TreeTask};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::frame::{FeatureRow, Scalar};

/// Failure while running a model on a row
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("X has {got} features, but the model is expecting {expected} features as input")]
    FeatureCount { expected: usize, got: usize },

    #[error("{0}")]
    NonNumeric(String),

    #[error("malformed model: {0}")]
    Malformed(String),
}

/// Point prediction capability
pub trait Predictor: Send + Sync {
    /// Predict a single value for one row
    fn predict(&self, row: &FeatureRow) -> Result<Scalar, ModelError>;

    /// Number of input columns the model was fitted on
    fn n_features(&self) -> usize;

    /// Probability capability, when the model has one
    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticPredictor> {
        None
    }
}

/// Class probability capability
pub trait ProbabilisticPredictor: Send + Sync {
    /// One probability per class, in [`ProbabilisticPredictor::classes`] order
    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError>;

    fn classes(&self) -> &[Scalar];
}

/// Persisted model document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum ModelArtifact {
    LinearRegression(LinearRegression),
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl ModelArtifact {
    /// Family name as stored in the document
    pub fn family(&self) -> &'static str {
        match self {
            ModelArtifact::LinearRegression(_) => "linear_regression",
            ModelArtifact::LogisticRegression(_) => "logistic_regression",
            ModelArtifact::DecisionTree(_) => "decision_tree",
            ModelArtifact::RandomForest(_) => "random_forest",
        }
    }

    /// Check structural consistency so a loaded model is usable
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            ModelArtifact::LinearRegression(m) => m.validate(),
            ModelArtifact::LogisticRegression(m) => m.validate(),
            ModelArtifact::DecisionTree(m) => m.validate(),
            ModelArtifact::RandomForest(m) => m.validate(),
        }
    }

    pub fn predictor(&self) -> &dyn Predictor {
        match self {
            ModelArtifact::LinearRegression(m) => m,
            ModelArtifact::LogisticRegression(m) => m,
            ModelArtifact::DecisionTree(m) => m,
            ModelArtifact::RandomForest(m) => m,
        }
    }
}

/// Numeric input vector of the expected width
fn numeric_input(row: &FeatureRow, expected: usize) -> Result<Vec<f64>, ModelError> {
    if row.width() != expected {
        return Err(ModelError::FeatureCount {
            expected,
            got: row.width(),
        });
    }
    let x = row.to_numeric().map_err(ModelError::NonNumeric)?;
    if let Some(i) = x.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::NonNumeric(format!(
            "Input contains NaN or infinity in column '{}'",
            row.columns()[i]
        )));
    }
    Ok(x)
}

/// Index of the largest value; the first one wins ties
fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

fn dot(weights: &[f64], x: &[f64]) -> f64 {
    weights.iter().zip(x).map(|(w, v)| w * v).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_wins_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_artifact_tagged_document() {
        let json = r#"{"model_type": "linear_regression", "coefficients": [2.0, 1.0], "intercept": 0.5}"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.family(), "linear_regression");
        assert!(artifact.validate().is_ok());
        assert!(artifact.predictor().as_probabilistic().is_none());
    }

    #[test]
    fn test_unknown_family_rejected() {
        let json = r#"{"model_type": "svm", "support_vectors": []}"#;
        assert!(serde_json::from_str::<ModelArtifact>(json).is_err());
    }

    #[test]
    fn test_feature_count_checked() {
        let row = FeatureRow::positional(vec![1.0]);
        assert_eq!(
            numeric_input(&row, 2),
            Err(ModelError::FeatureCount {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_missing_values_rejected() {
        let row = FeatureRow::new(
            vec!["a".into(), "b".into()],
            vec![Scalar::Float(1.0), Scalar::Null],
        )
        .unwrap();
        match numeric_input(&row, 2) {
            Err(ModelError::NonNumeric(message)) => assert!(message.contains("'b'")),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(numeric_input(&FeatureRow::positional(vec![f64::INFINITY]), 1).is_err());
    }
}
