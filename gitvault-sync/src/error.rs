//! Error types for gitvault-sync.

use std::path::PathBuf;

use thiserror::Error;

use gitvault_chunk::ChunkError;
use gitvault_core::error::VersionError;
use gitvault_core::InvalidFile;
use gitvault_git::GitError;
use gitvault_hub::HubError;

/// All errors that can arise from an archival run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A repository primitive failed.
    #[error("git error: {0}")]
    Git(#[from] GitError),

    /// Chunking or reassembly failed.
    #[error("chunk error: {0}")]
    Chunk(#[from] ChunkError),

    /// A hosting-service call failed.
    #[error("hub error: {0}")]
    Hub(#[from] HubError),

    /// A version string could not be parsed for comparison.
    #[error("version error: {0}")]
    Version(#[from] VersionError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The candidate version is older than what the channel already has.
    /// Raised before any repository mutation.
    #[error(
        "version regression on channel '{channel}': candidate {candidate} is older than published {newest}"
    )]
    Regression {
        candidate: String,
        newest: String,
        channel: String,
    },

    /// Files above the absolute size cap were found; the run is aborted so
    /// the caller can surface them instead of silently archiving a subset.
    #[error("{} file(s) exceed the absolute size cap", .0.len())]
    InvalidFiles(Vec<InvalidFile>),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
