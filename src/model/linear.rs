//! Ordinary least squares regression

use serde::{Deserialize, Serialize};

use super::{dot, numeric_input, ModelError, Predictor};
use crate::frame::{FeatureRow, Scalar};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearRegression {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.is_empty() {
            return Err(ModelError::Malformed("no coefficients".into()));
        }
        Ok(())
    }
}

impl Predictor for LinearRegression {
    fn predict(&self, row: &FeatureRow) -> Result<Scalar, ModelError> {
        let x = numeric_input(row, self.n_features())?;
        Ok(Scalar::Float(dot(&self.coefficients, &x) + self.intercept))
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict() {
        let model = LinearRegression {
            coefficients: vec![2.0, -1.0],
            intercept: 0.5,
        };
        let row = FeatureRow::positional(vec![3.0, 1.0]);
        assert_eq!(model.predict(&row).unwrap(), Scalar::Float(5.5));
    }

    #[test]
    fn test_rejects_text_input() {
        let model = LinearRegression {
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        let row = FeatureRow::new(vec!["color".into()], vec![Scalar::Text("red".into())]).unwrap();
        assert!(matches!(model.predict(&row), Err(ModelError::NonNumeric(_))));
    }
}
