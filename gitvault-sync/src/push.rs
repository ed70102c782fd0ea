//! Rate-limited, one-commit-at-a-time publication.

use std::thread;
use std::time::Duration;

use tracing::info;

use gitvault_git::{CommitId, EphemeralRemote, GitError, Repository};

use crate::error::SyncError;

const PUSH_REMOTE: &str = "gv-push";

/// Pushes commits individually, oldest first, sleeping a cooldown strictly
/// between pushes. Holds the authenticated ephemeral remote for its whole
/// lifetime; dropping the pipeline removes it.
pub struct PushPipeline<'a, R: Repository + ?Sized> {
    repo: &'a R,
    remote: EphemeralRemote<'a, R>,
    branch: String,
    cooldown: Duration,
    pushed: usize,
}

impl<'a, R: Repository + ?Sized> PushPipeline<'a, R> {
    pub fn open(
        repo: &'a R,
        auth_url: &str,
        branch: &str,
        cooldown: Duration,
    ) -> Result<Self, SyncError> {
        let remote = EphemeralRemote::create(repo, PUSH_REMOTE, auth_url)?;
        Ok(Self {
            repo,
            remote,
            branch: branch.to_string(),
            cooldown,
            pushed: 0,
        })
    }

    /// Commits pushed so far through this pipeline.
    pub fn pushed(&self) -> usize {
        self.pushed
    }

    /// Push every local commit the remote branch does not have yet
    /// (`remote_tip..local_head`, or the whole branch when the remote ref is
    /// absent). Returns the number pushed. A failed push aborts the rest;
    /// commits already pushed stay pushed.
    pub fn push_pending(&mut self) -> Result<usize, SyncError> {
        if self.repo.head()?.is_none() {
            return Ok(0);
        }

        let remote_ref = match self.repo.fetch(self.remote.name(), &self.branch, None) {
            Ok(()) => self
                .repo
                .resolve_ref(&format!("{}/{}", self.remote.name(), self.branch))?,
            Err(GitError::Command { stderr, .. })
                if stderr.contains("couldn't find remote ref") =>
            {
                None
            }
            Err(e) => return Err(e.into()),
        };

        let range = match remote_ref {
            Some(tip) => format!("{tip}..{}", self.branch),
            None => {
                info!(
                    "remote branch '{}' does not exist yet, pushing the whole history",
                    self.branch
                );
                self.branch.clone()
            }
        };

        let commits = self.repo.rev_list(&range)?;
        let count = commits.len();
        for commit in &commits {
            self.push_commit(commit)?;
        }
        Ok(count)
    }

    /// Push one commit at the branch ref with a lease-guarded force. Sleeps
    /// the cooldown first when a push already happened, so waits land
    /// between pushes and never after the last one.
    pub fn push_commit(&mut self, commit: &CommitId) -> Result<(), SyncError> {
        if self.pushed > 0 && !self.cooldown.is_zero() {
            info!("cooling down {}s before the next push", self.cooldown.as_secs());
            thread::sleep(self.cooldown);
        }

        let refspec = format!("{commit}:refs/heads/{}", self.branch);
        self.repo.push_ref(self.remote.name(), &refspec, true)?;
        self.pushed += 1;
        info!("pushed commit {}", commit.short());
        Ok(())
    }
}
