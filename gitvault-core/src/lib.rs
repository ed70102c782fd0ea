//! # gitvault-core
//!
//! Domain types and pure logic shared by every gitvault crate: change
//! records, batches and commit plans, size limits and commit identity,
//! archive-target metadata, and version/channel ordering for the tag guard.
//!
//! This crate performs no I/O; everything here is constructed from inputs
//! produced by `gitvault-git` (repository status) or the CLI (target
//! metadata) and is unit-testable in isolation.

pub mod config;
pub mod error;
pub mod target;
pub mod types;
pub mod version;

pub use config::{Identity, Limits, PushOptions};
pub use error::VersionError;
pub use target::ArchiveTarget;
pub use types::{Batch, ChangeStatus, ClassifiedChanges, CommitPlan, FileRecord, InvalidFile};
pub use version::Version;
