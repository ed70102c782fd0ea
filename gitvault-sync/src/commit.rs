//! One commit per batch, deletions first, streamed as they are created.

use chrono::Utc;
use tracing::{debug, info};

use gitvault_core::{Batch, CommitPlan, Identity};
use gitvault_git::{CommitId, Repository};

use crate::error::SyncError;

/// What one step of the sequence produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCommit {
    pub id: CommitId,
    pub kind: BatchKind,
    pub files: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Delete,
    Add,
}

/// Lazy commit creation over a [`CommitPlan`].
///
/// Each `next()` stages exactly one batch and commits it, so the caller can
/// push commit *N* while batch *N+1* has not been touched yet. A failed step
/// ends the sequence; batches already committed stand as valid history.
pub struct CommitSequence<'a, R: Repository + ?Sized> {
    repo: &'a R,
    identity: &'a Identity,
    deletions: Option<Vec<String>>,
    additions: std::vec::IntoIter<Batch>,
    step: usize,
    total: usize,
    failed: bool,
}

impl<'a, R: Repository + ?Sized> CommitSequence<'a, R> {
    pub fn new(repo: &'a R, plan: CommitPlan, identity: &'a Identity) -> Self {
        let total = plan.commit_count();
        Self {
            repo,
            identity,
            deletions: (!plan.deletions.is_empty()).then_some(plan.deletions),
            additions: plan.additions.into_iter(),
            step: 0,
            total,
            failed: false,
        }
    }

    fn commit_batch(&mut self, paths: &[String], kind: BatchKind) -> Result<CreatedCommit, SyncError> {
        self.step += 1;
        let verb = match kind {
            BatchKind::Delete => "Delete",
            BatchKind::Add => "Add",
        };
        info!(
            "[{}/{}] {} {} files",
            self.step,
            self.total,
            if kind == BatchKind::Delete { "removing" } else { "adding" },
            paths.len()
        );

        // Deletions are staged the same way: the paths are already gone from
        // the working tree, so staging records their removal.
        self.repo.stage(paths)?;

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        let message = format!(
            "Batch {}/{} | {verb} {} files | {timestamp}",
            self.step,
            self.total,
            paths.len()
        );
        let id = self.repo.commit(&message, self.identity)?;
        debug!("commit {} created", id.short());

        Ok(CreatedCommit {
            id,
            kind,
            files: paths.len(),
        })
    }
}

impl<R: Repository + ?Sized> Iterator for CommitSequence<'_, R> {
    type Item = Result<CreatedCommit, SyncError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let (paths, kind) = if let Some(deletions) = self.deletions.take() {
            (deletions, BatchKind::Delete)
        } else {
            (self.additions.next()?.paths, BatchKind::Add)
        };

        let result = self.commit_batch(&paths, kind);
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
