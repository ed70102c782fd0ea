//! # gitvault-git
//!
//! Narrow versioned-repository capability layer.
//!
//! The archival pipeline is written against the [`Repository`] trait, which
//! exposes exactly the primitives gitvault consumes: status with rename
//! detection, staging, commits with an explicit identity, ancestor queries,
//! bounded-depth fetches, resets, lease-protected single-ref pushes and tag
//! plumbing. [`GitCli`] implements it by shelling out to the `git` binary;
//! tests substitute in-memory fakes.
//!
//! Authenticated transport never outlives an operation: [`EphemeralRemote`]
//! scopes a token-carrying remote definition and removes it on drop.

pub mod cli_backend;
pub mod ephemeral;
pub mod error;
pub mod repo;
pub mod status;

pub use cli_backend::GitCli;
pub use ephemeral::EphemeralRemote;
pub use error::GitError;
pub use repo::{CommitId, Repository};
pub use status::{parse_porcelain, Rename, RepoStatus};
