//! Artifact format detection
//!
//! Each artifact lives under a fixed stem; the extension tells us how to
//! decode it. Candidates are tried in order and the first present blob wins.

use serde::de::DeserializeOwned;

use crate::error::{ArtifactKind, PredictError, Result};
use crate::repository::{ArtifactRepository, SessionHandle};

/// Detected artifact encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Yaml,
}

/// Extensions probed for every stem, in priority order
const CANDIDATES: [(&str, ArtifactFormat); 3] = [
    ("json", ArtifactFormat::Json),
    ("yaml", ArtifactFormat::Yaml),
    ("yml", ArtifactFormat::Yaml),
];

impl ArtifactFormat {
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> std::result::Result<T, String> {
        match self {
            ArtifactFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            ArtifactFormat::Yaml => serde_yaml::from_slice(bytes).map_err(|e| e.to_string()),
        }
    }
}

/// A present artifact blob and how to read it
#[derive(Debug, Clone)]
pub struct LocatedArtifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub extension: &'static str,
    pub format: ArtifactFormat,
    pub bytes: Vec<u8>,
}

impl LocatedArtifact {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        self.format
            .decode(&self.bytes)
            .map_err(|reason| PredictError::deserialization(self.kind, reason))
    }
}

/// Find the first candidate blob for `kind`, `Ok(None)` if none exists
pub fn locate_artifact<R: ArtifactRepository + ?Sized>(
    repo: &R,
    handle: &SessionHandle,
    kind: ArtifactKind,
) -> Result<Option<LocatedArtifact>> {
    for (extension, format) in CANDIDATES {
        let file_name = format!("{}.{}", kind.stem(), extension);
        let bytes = repo
            .read(handle, &file_name)
            .map_err(|source| PredictError::Storage {
                artifact: kind,
                source,
            })?;
        if let Some(bytes) = bytes {
            tracing::debug!(
                session = %handle.session_id,
                artifact = %kind,
                file = %file_name,
                "located artifact"
            );
            return Ok(Some(LocatedArtifact {
                kind,
                file_name,
                extension,
                format,
                bytes,
            }));
        }
    }
    Ok(None)
}
