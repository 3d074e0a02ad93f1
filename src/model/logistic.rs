//! Logistic regression classifier
//!
//! Two classes use a single coefficient row and the sigmoid; more classes use
//! one row per class and the softmax.

use serde::{Deserialize, Serialize};

use super::{argmax, dot, numeric_input, ModelError, Predictor, ProbabilisticPredictor};
use crate::frame::{FeatureRow, Scalar};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub classes: Vec<Scalar>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LogisticRegression {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.classes.len() < 2 {
            return Err(ModelError::Malformed(format!(
                "logistic regression needs at least 2 classes, got {}",
                self.classes.len()
            )));
        }
        let expected_rows = if self.classes.len() == 2 {
            1
        } else {
            self.classes.len()
        };
        if self.coefficients.len() != expected_rows {
            return Err(ModelError::Malformed(format!(
                "{} coefficient rows for {} classes",
                self.coefficients.len(),
                self.classes.len()
            )));
        }
        if self.intercepts.len() != self.coefficients.len() {
            return Err(ModelError::Malformed(format!(
                "{} intercepts for {} coefficient rows",
                self.intercepts.len(),
                self.coefficients.len()
            )));
        }
        let width = self.coefficients[0].len();
        if width == 0 || self.coefficients.iter().any(|row| row.len() != width) {
            return Err(ModelError::Malformed("ragged coefficient rows".into()));
        }
        Ok(())
    }

    fn decision(&self, x: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| dot(w, x) + b)
            .collect()
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl Predictor for LogisticRegression {
    fn predict(&self, row: &FeatureRow) -> Result<Scalar, ModelError> {
        let proba = self.predict_proba(row)?;
        argmax(&proba)
            .map(|i| self.classes[i].clone())
            .ok_or_else(|| ModelError::Malformed("empty probability vector".into()))
    }

    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticPredictor> {
        Some(self)
    }
}

impl ProbabilisticPredictor for LogisticRegression {
    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        let x = numeric_input(row, self.n_features())?;
        let scores = self.decision(&x);
        if scores.len() == 1 {
            let p = sigmoid(scores[0]);
            Ok(vec![1.0 - p, p])
        } else {
            Ok(softmax(&scores))
        }
    }

    fn classes(&self) -> &[Scalar] {
        &self.classes
    }
}
