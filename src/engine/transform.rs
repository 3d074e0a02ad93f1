//! Applying the preprocessing chain to an aligned row
//!
//! Stages never abort the request here. Each stage reports whether it was
//! absent, applied or failed, and a failed stage passes its input through.

use crate::frame::FeatureRow;
use crate::loader::ChainStatus;
use crate::preprocess::{RowTransform, TransformChain, TransformOutput};

/// Result of one preprocessing stage
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Absent,
    Applied,
    Failed(String),
}

impl StageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed(_))
    }
}

/// What happened to the preprocessing chain during one prediction
#[derive(Debug, Clone, PartialEq)]
pub struct TransformReport {
    pub chain: ChainStatus,
    pub encoder: StageOutcome,
    pub scaler: StageOutcome,
}

impl TransformReport {
    /// True when any part of the chain was skipped because it failed
    pub fn is_degraded(&self) -> bool {
        matches!(self.chain, ChainStatus::Corrupt(_))
            || self.encoder.is_failed()
            || self.scaler.is_failed()
    }

    /// Human-readable description of every degradation
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let ChainStatus::Corrupt(reason) = &self.chain {
            warnings.push(format!("Could not load transformers: {}", reason));
        }
        if let StageOutcome::Failed(reason) = &self.encoder {
            warnings.push(format!("Encoding failed: {}", reason));
        }
        if let StageOutcome::Failed(reason) = &self.scaler {
            warnings.push(format!("Scaling failed: {}", reason));
        }
        warnings
    }
}

/// Row after the chain plus the per-stage outcomes
#[derive(Debug, Clone)]
pub struct TransformedRow {
    pub row: FeatureRow,
    pub encoder: StageOutcome,
    pub scaler: StageOutcome,
}

fn run_stage(
    stage: Option<&dyn RowTransform>,
    name: &str,
    row: FeatureRow,
) -> (FeatureRow, StageOutcome) {
    let Some(stage) = stage else {
        return (row, StageOutcome::Absent);
    };
    match stage.transform(&row) {
        Ok(output) => {
            if let TransformOutput::Sparse(sparse) = &output {
                tracing::debug!(
                    stage = name,
                    width = sparse.width(),
                    nnz = sparse.nnz(),
                    "densifying sparse output"
                );
            }
            (output.densify(), StageOutcome::Applied)
        }
        Err(e) => {
            tracing::warn!(stage = name, error = %e, "preprocessing stage failed, continuing with its input");
            (row, StageOutcome::Failed(e.to_string()))
        }
    }
}

/// Encode, then scale
pub fn apply_chain(row: FeatureRow, chain: &TransformChain) -> TransformedRow {
    let (row, encoder) = run_stage(
        chain.encoder.as_ref().map(|e| e as &dyn RowTransform),
        "encoder",
        row,
    );
    let (row, scaler) = run_stage(
        chain.scaler.as_ref().map(|s| s as &dyn RowTransform),
        "scaler",
        row,
    );
    TransformedRow {
        row,
        encoder,
        scaler,
    }
}
