//! Preprocessing chain fitted at training time
//!
//! The chain is an optional encoder followed by an optional scaler. Both
//! stages share the [`RowTransform`] capability.

mod encoder;
mod scaler;

pub use encoder::{Encoder, EncodedColumn, HandleUnknown};
pub use scaler::Scaler;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::frame::{FeatureRow, SparseRow};

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct TransformError(pub String);

impl From<String> for TransformError {
    fn from(message: String) -> Self {
        TransformError(message)
    }
}

/// Output of a transform stage
#[derive(Debug, Clone, PartialEq)]
pub enum TransformOutput {
    Dense(FeatureRow),
    Sparse(SparseRow),
}

impl TransformOutput {
    /// Plain labelled row; sparse output gets positional labels
    pub fn densify(self) -> FeatureRow {
        match self {
            TransformOutput::Dense(row) => row,
            TransformOutput::Sparse(sparse) => FeatureRow::positional(sparse.to_dense()),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_sparse(&self) -> bool {
        matches!(self, TransformOutput::Sparse(_))
    }
}

/// Capability shared by every preprocessing stage
pub trait RowTransform: Send + Sync {
    fn transform(&self, row: &FeatureRow) -> Result<TransformOutput, TransformError>;
}

/// Persisted preprocessing chain; either stage may be absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformChain {
    #[serde(default)]
    pub encoder: Option<Encoder>,
    #[serde(default)]
    pub scaler: Option<Scaler>,
}

impl TransformChain {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.encoder.is_none() && self.scaler.is_none()
    }
}
