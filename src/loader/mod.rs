//! Artifact loading
//!
//! Models and metadata are required; the preprocessing chain is optional and
//! a broken chain is reported rather than raised.

mod detect;

pub use detect::{locate_artifact, ArtifactFormat, LocatedArtifact};

use crate::error::{ArtifactKind, PredictError, Result};
use crate::model::{ModelArtifact, ModelMetadata};
use crate::preprocess::TransformChain;
use crate::repository::{ArtifactRepository, SessionHandle};

/// Raw model blob without decoding it
pub fn read_model_blob<R: ArtifactRepository + ?Sized>(
    repo: &R,
    handle: &SessionHandle,
) -> Result<LocatedArtifact> {
    locate_artifact(repo, handle, ArtifactKind::Model)?
        .ok_or(PredictError::ArtifactNotFound(ArtifactKind::Model))
}

/// Load and validate the trained model
pub fn load_model<R: ArtifactRepository + ?Sized>(
    repo: &R,
    handle: &SessionHandle,
) -> Result<ModelArtifact> {
    let located = read_model_blob(repo, handle)?;
    let model: ModelArtifact = located.decode()?;
    model
        .validate()
        .map_err(|e| PredictError::deserialization(ArtifactKind::Model, e))?;
    tracing::debug!(
        session = %handle.session_id,
        family = model.family(),
        n_features = model.predictor().n_features(),
        "loaded model"
    );
    Ok(model)
}

/// Load the metadata document
pub fn load_metadata<R: ArtifactRepository + ?Sized>(
    repo: &R,
    handle: &SessionHandle,
) -> Result<ModelMetadata> {
    locate_artifact(repo, handle, ArtifactKind::Metadata)?
        .ok_or(PredictError::ArtifactNotFound(ArtifactKind::Metadata))?
        .decode()
}

/// How the preprocessing chain came out of storage
#[derive(Debug, Clone, PartialEq)]
pub enum ChainStatus {
    Loaded,
    Absent,
    Corrupt(String),
}

#[derive(Debug, Clone)]
pub struct LoadedChain {
    pub chain: TransformChain,
    pub status: ChainStatus,
}

/// Load the optional preprocessing chain
///
/// Never fails: an absent chain is empty, and a chain that cannot be read or
/// decoded is empty with [`ChainStatus::Corrupt`].
pub fn load_transform_chain<R: ArtifactRepository + ?Sized>(
    repo: &R,
    handle: &SessionHandle,
) -> LoadedChain {
    let corrupt = |reason: String| LoadedChain {
        chain: TransformChain::empty(),
        status: ChainStatus::Corrupt(reason),
    };

    match locate_artifact(repo, handle, ArtifactKind::Transforms) {
        Ok(None) => LoadedChain {
            chain: TransformChain::empty(),
            status: ChainStatus::Absent,
        },
        Ok(Some(located)) => match located.decode::<TransformChain>() {
            Ok(chain) => LoadedChain {
                chain,
                status: ChainStatus::Loaded,
            },
            Err(e) => corrupt(e.to_string()),
        },
        Err(e) => corrupt(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::FsRepository;

    fn session_with(files: &[(&str, &str)]) -> (tempfile::TempDir, FsRepository, SessionHandle) {
        let dir = tempfile::tempdir().unwrap();
        let session = dir.path().join("s");
        std::fs::create_dir(&session).unwrap();
        for (name, content) in files {
            std::fs::write(session.join(name), content).unwrap();
        }
        let repo = FsRepository::new(dir.path());
        let handle = repo.resolve("s").unwrap();
        (dir, repo, handle)
    }

    #[test]
    fn test_missing_model_is_not_found() {
        let (_dir, repo, handle) = session_with(&[]);
        assert!(matches!(
            load_model(&repo, &handle),
            Err(PredictError::ArtifactNotFound(ArtifactKind::Model))
        ));
        assert!(matches!(
            load_metadata(&repo, &handle),
            Err(PredictError::ArtifactNotFound(ArtifactKind::Metadata))
        ));
    }

    #[test]
    fn test_corrupt_model_is_deserialization_error() {
        let (_dir, repo, handle) = session_with(&[("best_model.json", "not json")]);
        assert!(matches!(
            load_model(&repo, &handle),
            Err(PredictError::Deserialization {
                artifact: ArtifactKind::Model,
                ..
            })
        ));
    }

    #[test]
    fn test_structurally_invalid_model_is_deserialization_error() {
        let (_dir, repo, handle) = session_with(&[(
            "best_model.json",
            r#"{"model_type": "linear_regression", "coefficients": []}"#,
        )]);
        assert!(matches!(
            load_model(&repo, &handle),
            Err(PredictError::Deserialization { .. })
        ));
    }

    #[test]
    fn test_yaml_model_loads() {
        let yaml = "model_type: linear_regression\ncoefficients: [1.0, 2.0]\nintercept: 0.0\n";
        let (_dir, repo, handle) = session_with(&[("best_model.yaml", yaml)]);
        let model = load_model(&repo, &handle).unwrap();
        assert_eq!(model.family(), "linear_regression");
    }

    #[test]
    fn test_transform_chain_states() {
        let (_dir, repo, handle) = session_with(&[]);
        assert_eq!(load_transform_chain(&repo, &handle).status, ChainStatus::Absent);

        let (_dir, repo, handle) = session_with(&[("transformers.json", "{broken")]);
        let loaded = load_transform_chain(&repo, &handle);
        assert!(matches!(loaded.status, ChainStatus::Corrupt(_)));
        assert!(loaded.chain.is_empty());

        let (_dir, repo, handle) = session_with(&[(
            "transformers.json",
            r#"{"scaler": {"kind": "standard", "mean": [0.0], "scale": [1.0]}}"#,
        )]);
        let loaded = load_transform_chain(&repo, &handle);
        assert_eq!(loaded.status, ChainStatus::Loaded);
        assert!(loaded.chain.scaler.is_some());
        assert!(loaded.chain.encoder.is_none());
    }
}
