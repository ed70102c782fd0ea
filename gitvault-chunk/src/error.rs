//! Error types for gitvault-chunk.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from chunk operations.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reassembly produced zero bytes — the group is corrupt.
    #[error("joined file would be empty: {path}")]
    EmptyJoin { path: PathBuf },

    /// A split was requested with a part size of zero.
    #[error("part size must be non-zero to split {path}")]
    ZeroPartSize { path: PathBuf },

    /// A split was requested for an empty file.
    #[error("refusing to split empty file {path}")]
    EmptySource { path: PathBuf },
}

/// Convenience constructor for [`ChunkError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ChunkError {
    ChunkError::Io {
        path: path.into(),
        source,
    }
}
