//! Session artifact storage
//!
//! The pipeline only needs two things from storage: resolve a session id to a
//! handle, and read a named blob inside it.

mod fs;

pub use fs::FsRepository;

use std::io;
use std::path::PathBuf;

use crate::error::Result;

/// Resolved storage location of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub session_id: String,
    pub location: PathBuf,
}

/// Read access to session artifacts
pub trait ArtifactRepository: Send + Sync {
    /// Resolve a session id, failing with `SessionNotFound` if it does not exist
    fn resolve(&self, session_id: &str) -> Result<SessionHandle>;

    /// Read a named blob; `Ok(None)` when the blob is absent
    fn read(&self, handle: &SessionHandle, name: &str) -> io::Result<Option<Vec<u8>>>;
}

/// Whether a session id is safe to use as a single path component
pub fn is_valid_session_id(session_id: &str) -> bool {
    !session_id.is_empty()
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
