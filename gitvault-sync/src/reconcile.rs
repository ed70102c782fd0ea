//! Local/remote history reconciliation, run once before any new commits.

use serde::Serialize;
use tracing::{info, warn};

use gitvault_git::{EphemeralRemote, GitError, Repository};

use crate::error::SyncError;

const SYNC_REMOTE: &str = "gv-sync";

/// Relationship between local history and the remote branch tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// The branch does not exist upstream.
    NoRemote,
    /// Local head and remote tip are the same commit.
    Equal,
    /// Local has unpushed commits on top of the remote tip.
    Ahead,
    /// The remote has commits local does not; local is moved forward.
    Behind,
    /// Histories are unrelated; local commits are discarded in favour of the
    /// remote, which is authoritative for its channel.
    Diverged,
}

/// Everything the state classification needs, gathered up front so the
/// transition function stays pure and testable without a repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryView {
    pub remote_exists: bool,
    pub local_has_commits: bool,
    pub heads_equal: bool,
    /// The remote tip is an ancestor of the local head.
    pub remote_in_local: bool,
    /// The local head is an ancestor of the remote tip.
    pub local_in_remote: bool,
}

/// The five-state transition function. An empty local repository facing an
/// existing remote branch is `Behind` by convention.
pub fn classify_history(view: HistoryView) -> SyncState {
    if !view.remote_exists {
        SyncState::NoRemote
    } else if !view.local_has_commits {
        SyncState::Behind
    } else if view.heads_equal {
        SyncState::Equal
    } else if view.remote_in_local {
        SyncState::Ahead
    } else if view.local_in_remote {
        SyncState::Behind
    } else {
        SyncState::Diverged
    }
}

/// Fetch the remote branch through an ephemeral authenticated remote,
/// classify the relationship, and apply the corrective action.
///
/// An empty local repository fetches at depth 1: only the tip is adopted and
/// no ancestry is queried. With local history present the fetch is full, so
/// the ancestor queries see the real graph instead of a shallow graft.
///
/// Behind with local commits: hard reset forward (no committed work is
/// lost). Behind with an empty local repository, and Diverged: adopt the
/// remote tip without touching the working tree (soft reset, then realign
/// the index so status reflects the tree honestly). Ahead and Equal take no
/// action.
pub fn reconcile<R: Repository + ?Sized>(
    repo: &R,
    auth_url: &str,
    branch: &str,
) -> Result<SyncState, SyncError> {
    let remote = EphemeralRemote::create(repo, SYNC_REMOTE, auth_url)?;
    let local_head = repo.head()?;
    let depth = if local_head.is_none() { Some(1) } else { None };

    let remote_tip = match repo.fetch(remote.name(), branch, depth) {
        Ok(()) => repo.resolve_ref(&format!("{}/{branch}", remote.name()))?,
        Err(GitError::Command { stderr, .. }) if stderr.contains("couldn't find remote ref") => {
            None
        }
        Err(e) => return Err(e.into()),
    };

    let Some(remote_tip) = remote_tip else {
        info!("no history upstream for '{branch}'");
        return Ok(SyncState::NoRemote);
    };

    let view = match &local_head {
        None => HistoryView {
            remote_exists: true,
            ..HistoryView::default()
        },
        Some(local) => HistoryView {
            remote_exists: true,
            local_has_commits: true,
            heads_equal: *local == remote_tip,
            remote_in_local: repo.is_ancestor(&remote_tip, local)?,
            local_in_remote: repo.is_ancestor(local, &remote_tip)?,
        },
    };

    let state = classify_history(view);
    match state {
        SyncState::Equal => info!("local history matches the remote tip"),
        SyncState::Ahead => info!("local has unpushed commits, resuming"),
        SyncState::Behind if local_head.is_some() => {
            info!("fast-forwarding local history to {}", remote_tip.short());
            repo.reset_hard(&remote_tip.0)?;
        }
        SyncState::Behind => {
            info!("adopting remote history {}", remote_tip.short());
            repo.reset_soft(&remote_tip.0)?;
            repo.unstage_all()?;
        }
        SyncState::Diverged => {
            warn!(
                "local history diverged from the remote; discarding local commits in favour of {}",
                remote_tip.short()
            );
            repo.reset_soft(&remote_tip.0)?;
            repo.unstage_all()?;
        }
        SyncState::NoRemote => {}
    }

    Ok(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
