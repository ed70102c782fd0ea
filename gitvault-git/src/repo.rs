//! The versioned-repository capability trait.
//!
//! Exactly the primitives the archival pipeline consumes — nothing more.
//! Implementations may shell out ([`crate::GitCli`]), bind a library, or be
//! in-memory fakes for tests; the pipeline never cares which.

use std::fmt;
use std::path::Path;

use gitvault_core::Identity;

use crate::error::GitError;
use crate::status::RepoStatus;

/// An opaque commit identifier (full hex SHA for the git backend).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(pub String);

impl CommitId {
    /// Abbreviated form for log lines.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(10);
        &self.0[..end]
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CommitId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Mutation and query primitives over one local repository.
///
/// All methods take `&self`; implementations are free to use interior
/// mutability or external processes. The pipeline never accesses a
/// repository from more than one stage at a time.
pub trait Repository {
    /// Root of the working tree.
    fn workdir(&self) -> &Path;

    /// Working-tree status with rename detection.
    fn status(&self) -> Result<RepoStatus, GitError>;

    /// Stage the given paths, including deletions (`git add -A -- <paths>`).
    fn stage(&self, paths: &[String]) -> Result<(), GitError>;

    /// Unstage everything, leaving the working tree untouched.
    fn unstage_all(&self) -> Result<(), GitError>;

    /// Commit the index with the given message; the identity is used for
    /// both author and committer. Returns the new commit.
    fn commit(&self, message: &str, identity: &Identity) -> Result<CommitId, GitError>;

    /// Current HEAD commit, or `None` when the repository has no commits.
    fn head(&self) -> Result<Option<CommitId>, GitError>;

    /// Resolve any ref name (branch, remote-tracking ref, tag) to a commit,
    /// or `None` when it does not exist.
    fn resolve_ref(&self, refname: &str) -> Result<Option<CommitId>, GitError>;

    /// True when `ancestor` is reachable from `descendant`.
    fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> Result<bool, GitError>;

    /// Commits in `range` (e.g. `a..b` or a branch name), oldest first.
    fn rev_list(&self, range: &str) -> Result<Vec<CommitId>, GitError>;

    /// Make `branch` the checked-out branch, creating or resetting it.
    /// Works on an empty repository (points HEAD at the unborn branch).
    fn checkout_branch(&self, branch: &str) -> Result<(), GitError>;

    /// Hard reset: move HEAD, index and working tree to `target`.
    fn reset_hard(&self, target: &str) -> Result<(), GitError>;

    /// Soft reset: move HEAD to `target`, preserving index and working tree.
    fn reset_soft(&self, target: &str) -> Result<(), GitError>;

    // --- remotes -----------------------------------------------------------

    fn has_remote(&self, name: &str) -> Result<bool, GitError>;
    fn create_remote(&self, name: &str, url: &str) -> Result<(), GitError>;
    fn delete_remote(&self, name: &str) -> Result<(), GitError>;
    fn set_remote_url(&self, name: &str, url: &str) -> Result<(), GitError>;

    /// Fetch one branch from a remote, optionally shallow.
    fn fetch(&self, remote: &str, branch: &str, depth: Option<u32>) -> Result<(), GitError>;

    /// Push a single refspec. With `force_with_lease` the update is forced
    /// but aborts if the remote ref moved since our last observation.
    fn push_ref(&self, remote: &str, refspec: &str, force_with_lease: bool)
        -> Result<(), GitError>;

    // --- tags --------------------------------------------------------------

    fn list_tags(&self) -> Result<Vec<String>, GitError>;
    fn tag_target(&self, tag: &str) -> Result<Option<CommitId>, GitError>;
    fn create_tag(&self, tag: &str) -> Result<(), GitError>;
    fn delete_tag(&self, tag: &str) -> Result<(), GitError>;

    // --- identity ----------------------------------------------------------

    /// True when user.name and user.email are both configured (any level).
    fn identity_configured(&self) -> Result<bool, GitError>;

    /// Write the identity into repository-local config.
    fn set_identity(&self, identity: &Identity) -> Result<(), GitError>;
}
