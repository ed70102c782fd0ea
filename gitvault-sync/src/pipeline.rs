//! The archive pipeline: one full run over one target directory.

use std::fs;

use serde::Serialize;
use tracing::{info, warn};

use gitvault_chunk::{split, write_restore_marker, RESTORE_MARKER};
use gitvault_core::{ArchiveTarget, ChangeStatus, FileRecord, Identity, Limits, PushOptions};
use gitvault_git::Repository;
use gitvault_hub::RemoteHost;

use crate::commit::CommitSequence;
use crate::error::{io_err, SyncError};
use crate::push::PushPipeline;
use crate::reconcile::{reconcile, SyncState};
use crate::{batch, classify, tags};

/// What happened to the release tag at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagAction {
    Created,
    Moved,
    Unchanged,
}

/// Outcome summary of one archival run.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
    pub sync_state: SyncState,
    pub commits_created: usize,
    pub commits_pushed: usize,
    pub chunked_files: Vec<String>,
    pub tag: String,
    pub tag_action: TagAction,
}

/// Run the whole pipeline for one target: regression guard, repository
/// provisioning, reconciliation, classification, chunking, batched commits
/// pushed one by one, then the release tag.
pub fn archive<R, H>(
    repo: &R,
    host: &H,
    target: &ArchiveTarget,
    limits: &Limits,
    identity: &Identity,
    push: &PushOptions,
) -> Result<ArchiveReport, SyncError>
where
    R: Repository + ?Sized,
    H: RemoteHost + ?Sized,
{
    info!("archiving {target}");
    let repo_name = target.repo_name();
    let branch = target.branch_name();
    let tag = target.tag_name();

    // Version guard first: a regression must abort before anything mutates.
    let username = host.authenticated_user()?;
    if host.repo_exists(&username, &repo_name)? {
        let remote_tags = host.list_tags(&username, &repo_name)?;
        tags::check_regression(&target.version, &target.channel, &remote_tags)?;
    }

    let clone_url = host.get_or_create_repo(&repo_name)?;
    let auth_url = host.authenticated_url(&clone_url);

    if !repo.identity_configured()? {
        repo.set_identity(identity)?;
    }

    // The long-lived remote keeps the clean URL; the token only ever rides
    // in ephemeral remotes.
    if repo.has_remote(&push.remote_name)? {
        repo.set_remote_url(&push.remote_name, &clone_url)?;
    } else {
        repo.create_remote(&push.remote_name, &clone_url)?;
    }
    repo.checkout_branch(&branch)?;

    let sync_state = reconcile(repo, &auth_url, &branch)?;

    let status = repo.status()?;
    let mut changes = classify::classify(repo.workdir(), &status, limits)?;
    if !changes.invalid.is_empty() {
        for invalid in &changes.invalid {
            warn!(
                "  [X] {} ({:.2} MiB): {}",
                invalid.path,
                invalid.size as f64 / (1024.0 * 1024.0),
                invalid.reason
            );
        }
        return Err(SyncError::InvalidFiles(changes.invalid));
    }

    // Oversized files become chunk parts: the original is recorded as a
    // deletion and every part as new content to batch.
    let mut chunked_files = Vec::new();
    for record in std::mem::take(&mut changes.to_chunk) {
        info!("chunking {} ({} bytes)", record.path, record.size);
        let full = repo.workdir().join(&record.path);
        let parts = split(&full, limits.chunk_part_bytes)?;

        for part in &parts {
            let name = part
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let rel = match record.path.rsplit_once('/') {
                Some((dir, _)) => format!("{dir}/{name}"),
                None => name,
            };
            let size = fs::metadata(part).map_err(|e| io_err(part, e))?.len();
            changes.to_batch.push(FileRecord {
                path: rel,
                size,
                status: ChangeStatus::New,
            });
        }
        // Only a tracked original leaves a deletion to record; an untracked
        // one was never in the index to begin with.
        if record.status != ChangeStatus::New {
            changes.deleted.push(record.path.clone());
        }
        chunked_files.push(record.path);
    }

    if !chunked_files.is_empty() {
        let marker = write_restore_marker(repo.workdir())?;
        let size = fs::metadata(&marker).map_err(|e| io_err(&marker, e))?.len();
        changes.to_batch.push(FileRecord {
            path: RESTORE_MARKER.to_string(),
            size,
            status: ChangeStatus::New,
        });
    }

    let plan = batch::plan(&changes.to_batch, &changes.deleted, limits.max_batch_bytes);
    info!(
        "{} commit(s) planned ({} deletions, {} add-batches)",
        plan.commit_count(),
        plan.deletions.len(),
        plan.additions.len()
    );

    let mut pusher = PushPipeline::open(repo, &auth_url, &branch, push.cooldown)?;

    // Catch up on commits a previous interrupted run left unpushed.
    let backlog = pusher.push_pending()?;
    if backlog > 0 {
        info!("pushed {backlog} commit(s) left over from an earlier run");
    }

    let mut commits_created = 0;
    for created in CommitSequence::new(repo, plan, identity) {
        let created = created?;
        pusher.push_commit(&created.id)?;
        commits_created += 1;
    }
    let commits_pushed = pusher.pushed();
    drop(pusher);

    let tag_existed = repo.tag_target(&tag)?.is_some();
    let force = commits_created > 0;
    let tag_action = if tags::ensure_tag(repo, &tag, force)? {
        tags::push_tag(repo, &auth_url, &tag, force)?;
        if tag_existed {
            TagAction::Moved
        } else {
            TagAction::Created
        }
    } else {
        TagAction::Unchanged
    };

    // Cosmetic on the host side; failure never spoils an archived run.
    match host.set_default_branch(&repo_name, &branch) {
        Ok(_) => {}
        Err(e) => warn!("could not set the default branch: {e}"),
    }

    info!(
        "run finished: {commits_created} commit(s) created, {commits_pushed} pushed, tag {tag} {tag_action:?}"
    );
    Ok(ArchiveReport {
        sync_state,
        commits_created,
        commits_pushed,
        chunked_files,
        tag,
        tag_action,
    })
}
