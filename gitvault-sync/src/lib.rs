//! # gitvault-sync
//!
//! The incremental-archival pipeline: change classification, byte-bounded
//! batching, local/remote reconciliation, streamed commits, rate-limited
//! pushes and the version-regression tag guard.
//!
//! Call [`pipeline::archive`] for a full run over one target directory; the
//! individual stages are public for callers that only need a piece (the CLI
//! `plan` command stops after [`batch::plan`]).

pub mod batch;
pub mod classify;
pub mod commit;
pub mod error;
pub mod pipeline;
pub mod push;
pub mod reconcile;
pub mod tags;

pub use commit::{BatchKind, CommitSequence, CreatedCommit};
pub use error::SyncError;
pub use pipeline::{archive, ArchiveReport, TagAction};
pub use push::PushPipeline;
pub use reconcile::{classify_history, reconcile, HistoryView, SyncState};
