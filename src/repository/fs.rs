//! Filesystem-backed repository: one directory per session

use std::io;
use std::path::{Path, PathBuf};

use super::{is_valid_session_id, ArtifactRepository, SessionHandle};
use crate::error::{ArtifactKind, PredictError, Result};

#[derive(Debug, Clone)]
pub struct FsRepository {
    root: PathBuf,
}

impl FsRepository {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Session ids that hold a model artifact, sorted
    pub fn list_sessions(&self) -> io::Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let pattern = self.root.join("*").join(format!("{}.*", ArtifactKind::Model.stem()));
        let mut sessions: Vec<String> = glob::glob(&pattern.to_string_lossy())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
            .filter_map(|entry| entry.ok())
            .filter_map(|path| {
                path.parent()
                    .and_then(|dir| dir.file_name())
                    .map(|name| name.to_string_lossy().to_string())
            })
            .filter(|id| is_valid_session_id(id))
            .collect();
        sessions.sort();
        sessions.dedup();
        Ok(sessions)
    }
}

impl ArtifactRepository for FsRepository {
    fn resolve(&self, session_id: &str) -> Result<SessionHandle> {
        if !is_valid_session_id(session_id) {
            return Err(PredictError::SessionNotFound(session_id.to_string()));
        }
        let location = self.root.join(session_id);
        if !location.is_dir() {
            return Err(PredictError::SessionNotFound(session_id.to_string()));
        }
        Ok(SessionHandle {
            session_id: session_id.to_string(),
            location,
        })
    }

    fn read(&self, handle: &SessionHandle, name: &str) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(handle.location.join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
