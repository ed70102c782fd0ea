//! Scoped, token-carrying remote definitions.
//!
//! Pushing with credentials means writing a URL with an embedded token into
//! the repository config. That URL must never outlive the operation that
//! needed it, so it lives in a throwaway remote that is removed on every
//! exit path — the guard deletes it on drop, panic or not.

use tracing::warn;

use crate::error::GitError;
use crate::repo::Repository;

/// A temporary remote definition, removed when the guard is dropped.
pub struct EphemeralRemote<'a, R: Repository + ?Sized> {
    repo: &'a R,
    name: String,
}

impl<'a, R: Repository + ?Sized> EphemeralRemote<'a, R> {
    /// Create the remote `name` pointing at `url`. A stale remote with the
    /// same name (from a crashed earlier run) is removed first.
    pub fn create(repo: &'a R, name: &str, url: &str) -> Result<Self, GitError> {
        if repo.has_remote(name)? {
            warn!("stale ephemeral remote '{name}' found, removing before use");
            repo.delete_remote(name)?;
        }
        repo.create_remote(name, url)?;
        Ok(Self {
            repo,
            name: name.to_string(),
        })
    }

    /// The remote's name, for fetch/push calls made while the guard lives.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<R: Repository + ?Sized> Drop for EphemeralRemote<'_, R> {
    fn drop(&mut self) {
        if let Err(e) = self.repo.delete_remote(&self.name) {
            warn!("failed to remove ephemeral remote '{}': {e}", self.name);
        }
    }
}
