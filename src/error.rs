//! Error taxonomy for the prediction pipeline
//!
//! Fatal failures surface as [`PredictError`]. Degradations that the pipeline
//! absorbs (transform chain problems, probability failures) are never errors;
//! they are reported through [`crate::engine::TransformReport`] instead.

use std::fmt;

use thiserror::Error;

/// Which persisted artifact an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Metadata,
    Transforms,
}

impl ArtifactKind {
    /// File stem the artifact is stored under inside a session
    pub fn stem(self) -> &'static str {
        match self {
            ArtifactKind::Model => "best_model",
            ArtifactKind::Metadata => "model_metadata",
            ArtifactKind::Transforms => "transformers",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Model => write!(f, "model"),
            ArtifactKind::Metadata => write!(f, "model metadata"),
            ArtifactKind::Transforms => write!(f, "preprocessing transformers"),
        }
    }
}

/// Fatal pipeline error
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Session {0} not found")]
    SessionNotFound(String),

    #[error("{}", artifact_not_found_message(.0))]
    ArtifactNotFound(ArtifactKind),

    #[error("Error loading {artifact}: {reason}")]
    Deserialization {
        artifact: ArtifactKind,
        reason: String,
    },

    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Error making prediction: {0}")]
    PredictionFailure(String),

    #[error("Storage error reading {artifact}: {source}")]
    Storage {
        artifact: ArtifactKind,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn artifact_not_found_message(kind: &ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Model => "No trained model found. Please train a model first.",
        ArtifactKind::Metadata => "Model metadata not found. Please train a model first.",
        ArtifactKind::Transforms => "Preprocessing transformers not found",
    }
}

impl PredictError {
    pub fn deserialization(artifact: ArtifactKind, reason: impl fmt::Display) -> Self {
        PredictError::Deserialization {
            artifact,
            reason: reason.to_string(),
        }
    }

    /// Whether the error means something the caller asked for does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PredictError::SessionNotFound(_) | PredictError::ArtifactNotFound(_)
        )
    }

    /// HTTP status code the transport should answer with
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else {
            500
        }
    }

    /// Stable machine-readable error type
    pub fn error_type(&self) -> &'static str {
        match self {
            PredictError::SessionNotFound(_) => "session_not_found",
            PredictError::ArtifactNotFound(_) => "artifact_not_found",
            PredictError::Deserialization { .. } => "deserialization_error",
            PredictError::SchemaMismatch(_) => "schema_mismatch",
            PredictError::PredictionFailure(_) => "prediction_failure",
            PredictError::Storage { .. } => "storage_error",
            PredictError::Internal(_) => "internal_error",
        }
    }
}

/// Result alias used by the pipeline
pub type Result<T> = std::result::Result<T, PredictError>;
