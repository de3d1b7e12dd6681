//! Errors surfaced by the scene core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::scene::EntryRef;

pub type SceneResult<T> = Result<T, SceneError>;

/// Every variant is recoverable; the scene stays usable after any of them.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no scene entry for {0}")]
    NotFound(EntryRef),

    #[error("malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("malformed project document: {0}")]
    MalformedDocument(String),

    #[error("unsupported format version {found} (this build reads up to {supported})")]
    UnsupportedFormatVersion { found: u64, supported: u64 },

    #[error("storage error on {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SceneError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SceneError::Storage {
            path: path.into(),
            source,
        }
    }
}
