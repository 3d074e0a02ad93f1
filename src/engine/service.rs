//! Per-request prediction service
//!
//! Nothing is cached between calls: every request resolves the session, reads
//! and decodes its artifacts, and drops them when it returns. Concurrent
//! requests therefore never share state.

use crate::config::{FailurePolicy, InferenceConfig};
use crate::engine::align::align_features;
use crate::engine::executor::{Executor, PredictionResult};
use crate::engine::transform::{apply_chain, TransformReport};
use crate::error::{ArtifactKind, PredictError, Result};
use crate::frame::FeatureRecord;
use crate::loader::{self, ChainStatus};
use crate::model::FeatureSchema;
use crate::repository::ArtifactRepository;

/// A prediction and what happened to preprocessing on the way
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub result: PredictionResult,
    pub report: TransformReport,
}

/// Raw model bytes ready to hand to a caller
#[derive(Debug, Clone)]
pub struct ModelExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct PredictionService<R: ArtifactRepository> {
    repo: R,
    config: InferenceConfig,
}

impl<R: ArtifactRepository> PredictionService<R> {
    pub fn new(repo: R, config: InferenceConfig) -> Self {
        Self { repo, config }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Predict a single record with the session's best model
    pub fn predict(&self, session_id: &str, record: &FeatureRecord) -> Result<PredictionOutcome> {
        tracing::debug!(session = %session_id, features = record.len(), "predict request");
        let handle = self.repo.resolve(session_id)?;
        let model = loader::load_model(&self.repo, &handle)?;
        let metadata = loader::load_metadata(&self.repo, &handle)?;

        let loaded = loader::load_transform_chain(&self.repo, &handle);
        if let ChainStatus::Corrupt(reason) = &loaded.status {
            if self.config.transform_failures == FailurePolicy::Fail {
                return Err(PredictError::deserialization(
                    ArtifactKind::Transforms,
                    reason,
                ));
            }
            tracing::warn!(
                session = %session_id,
                error = %reason,
                "could not load transformers, predicting on raw features"
            );
        }

        let aligned = align_features(
            record,
            &metadata.feature_names,
            self.config.unknown_features,
        )?;
        let transformed = apply_chain(aligned, &loaded.chain);
        let report = TransformReport {
            chain: loaded.status,
            encoder: transformed.encoder,
            scaler: transformed.scaler,
        };
        if self.config.transform_failures == FailurePolicy::Fail && report.is_degraded() {
            return Err(PredictError::PredictionFailure(report.warnings().join("; ")));
        }

        let result = Executor::new(&model, &metadata).run(&transformed.row)?;
        tracing::info!(
            session = %session_id,
            model = %metadata.model_name,
            label = %result.predicted_label,
            degraded = report.is_degraded(),
            "prediction complete"
        );
        Ok(PredictionOutcome { result, report })
    }

    /// Schema a caller must follow when building a record
    pub fn feature_schema(&self, session_id: &str) -> Result<FeatureSchema> {
        let handle = self.repo.resolve(session_id)?;
        Ok(loader::load_metadata(&self.repo, &handle)?.schema())
    }

    /// Stored model bytes, untouched and undecoded
    pub fn export_model(&self, session_id: &str) -> Result<ModelExport> {
        let handle = self.repo.resolve(session_id)?;
        let blob = loader::read_model_blob(&self.repo, &handle)?;
        Ok(ModelExport {
            file_name: format!("model_{}.{}", session_id, blob.extension),
            bytes: blob.bytes,
        })
    }
}
