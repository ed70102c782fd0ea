//! Error types for gitvault-git.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from repository operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be launched at all.
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// Opening required an existing repository and found none.
    #[error("no git repository at {path}")]
    NotARepository { path: PathBuf },

    /// git ran and exited non-zero.
    #[error("git {args} failed: {stderr}")]
    Command { args: String, stderr: String },

    /// git produced output we could not interpret.
    #[error("unexpected git output: {0}")]
    Parse(String),
}
