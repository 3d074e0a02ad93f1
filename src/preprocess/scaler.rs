//! Numeric scalers
//!
//! Scalers operate on the whole row and keep its column labels.

use serde::{Deserialize, Serialize};

use super::{RowTransform, TransformError, TransformOutput};
use crate::frame::FeatureRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default = "default_true")]
        with_mean: bool,
        #[serde(default = "default_true")]
        with_std: bool,
    },
    /// Maps `[data_min, data_min + data_range]` onto `feature_range`
    MinMax {
        data_min: Vec<f64>,
        data_range: Vec<f64>,
        #[serde(default = "default_feature_range")]
        feature_range: (f64, f64),
    },
}

fn default_true() -> bool {
    true
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Zero-variance columns are left unscaled
fn safe_divisor(d: f64) -> f64 {
    if d == 0.0 {
        1.0
    } else {
        d
    }
}

impl Scaler {
    fn width(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { data_min, .. } => data_min.len(),
        }
    }

    fn scale(&self, x: &[f64]) -> Vec<f64> {
        match self {
            Scaler::Standard {
                mean,
                scale,
                with_mean,
                with_std,
            } => x
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let centered = if *with_mean { v - mean[i] } else { *v };
                    if *with_std {
                        centered / safe_divisor(scale[i])
                    } else {
                        centered
                    }
                })
                .collect(),
            Scaler::MinMax {
                data_min,
                data_range,
                feature_range: (lo, hi),
            } => x
                .iter()
                .enumerate()
                .map(|(i, v)| (v - data_min[i]) / safe_divisor(data_range[i]) * (hi - lo) + lo)
                .collect(),
        }
    }

    fn check_shape(&self) -> Result<(), TransformError> {
        let consistent = match self {
            Scaler::Standard { mean, scale, .. } => mean.len() == scale.len(),
            Scaler::MinMax {
                data_min,
                data_range,
                ..
            } => data_min.len() == data_range.len(),
        };
        if consistent {
            Ok(())
        } else {
            Err(TransformError("scaler parameters have mismatched lengths".into()))
        }
    }
}

impl RowTransform for Scaler {
    fn transform(&self, row: &FeatureRow) -> Result<TransformOutput, TransformError> {
        self.check_shape()?;
        if row.width() != self.width() {
            return Err(TransformError(format!(
                "X has {} features, but the scaler is expecting {} features as input",
                row.width(),
                self.width()
            )));
        }
        let x = row.to_numeric()?;
        Ok(TransformOutput::Dense(row.with_numeric(self.scale(&x))?))
    }
}
