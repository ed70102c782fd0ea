//! Change records, classification buckets, batches and commit plans.
//!
//! Paths in these types are repository-relative, slash-separated strings as
//! reported by the repository status — not filesystem `PathBuf`s. They are
//! handed back to the repository primitives verbatim.
//!
//! All of these are transient: rebuilt from live repository state on every
//! run, never persisted.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Change records
// ---------------------------------------------------------------------------

/// How a path differs from the last committed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    New,
    Modified,
    Deleted,
    Renamed,
    TypeChanged,
    Copied,
}

/// A single changed path with its on-disk size, immutable once classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub size: u64,
    pub status: ChangeStatus,
}

/// A path rejected outright (above the absolute size cap), with the reason
/// surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidFile {
    pub path: String,
    pub size: u64,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Classification output
// ---------------------------------------------------------------------------

/// Partition of every changed path into exactly one bucket.
///
/// `to_batch` is kept sorted ascending by size so downstream batching is
/// weight-balanced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedChanges {
    /// Normal files, size ≤ the single-file cap.
    pub to_batch: Vec<FileRecord>,
    /// Oversized files needing chunking (file cap < size ≤ absolute cap).
    pub to_chunk: Vec<FileRecord>,
    /// Paths deleted from the working tree.
    pub deleted: Vec<String>,
    /// Files above the absolute cap; never committed.
    pub invalid: Vec<InvalidFile>,
}

impl ClassifiedChanges {
    pub fn is_empty(&self) -> bool {
        self.to_batch.is_empty()
            && self.to_chunk.is_empty()
            && self.deleted.is_empty()
            && self.invalid.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Batches and commit plans
// ---------------------------------------------------------------------------

/// An ordered group of paths destined for one commit.
///
/// Cumulative size never exceeds the batch budget, except a singleton batch
/// whose sole member alone exceeds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub paths: Vec<String>,
    pub total_bytes: u64,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// An optional deletion batch (always applied first) followed by zero or
/// more add-batches, each destined for exactly one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitPlan {
    pub deletions: Vec<String>,
    pub additions: Vec<Batch>,
}

impl CommitPlan {
    /// Number of commits this plan will produce.
    pub fn commit_count(&self) -> usize {
        self.additions.len() + usize::from(!self.deletions.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.commit_count() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
