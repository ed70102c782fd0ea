//! Error types for gitvault-core.

use thiserror::Error;

/// Errors from version parsing (tag guard input).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The string contained no numeric component to compare.
    #[error("no numeric version component in '{0}'")]
    NoNumericComponent(String),
}
