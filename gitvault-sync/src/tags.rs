//! The monotonic version guard and tag lifecycle.

use tracing::{error, info, warn};

use gitvault_core::version::{newest_on_channel, Version};
use gitvault_git::{EphemeralRemote, Repository};

use crate::error::SyncError;

const TAG_REMOTE: &str = "gv-tag";

/// Refuse to archive `candidate` when `channel` already has a strictly newer
/// published version among `remote_tags`. Tags from other channels never
/// participate. Runs before any repository mutation.
pub fn check_regression(
    candidate: &str,
    channel: &str,
    remote_tags: &[String],
) -> Result<(), SyncError> {
    let Some(newest) = newest_on_channel(remote_tags, channel) else {
        return Ok(());
    };
    let candidate_version = Version::parse(candidate)?;

    if candidate_version < newest {
        error!(
            "refusing to archive {candidate} on '{channel}': version {newest} is already published"
        );
        return Err(SyncError::Regression {
            candidate: candidate_version.to_string(),
            newest: newest.to_string(),
            channel: channel.to_string(),
        });
    }
    Ok(())
}

/// Create or move the local tag onto HEAD.
///
/// Without `force` an existing tag is left alone. With `force`, a tag
/// pointing at a superseded commit is deleted and recreated; a tag already
/// on HEAD is untouched. Returns whether the tag changed (and so needs a
/// push).
pub fn ensure_tag<R: Repository + ?Sized>(
    repo: &R,
    tag: &str,
    force: bool,
) -> Result<bool, SyncError> {
    if let Some(target) = repo.tag_target(tag)? {
        if !force {
            warn!("tag '{tag}' already exists locally, skipping");
            return Ok(false);
        }
        if repo.head()?.as_ref() == Some(&target) {
            info!("tag '{tag}' is already on the latest commit");
            return Ok(false);
        }
        info!("moving tag '{tag}' to the new head");
        repo.delete_tag(tag)?;
    }

    repo.create_tag(tag)?;
    Ok(true)
}

/// Push the tag through an ephemeral authenticated remote. The `+` refspec
/// prefix forces the remote tag to move when history was rewritten.
pub fn push_tag<R: Repository + ?Sized>(
    repo: &R,
    auth_url: &str,
    tag: &str,
    force: bool,
) -> Result<(), SyncError> {
    let remote = EphemeralRemote::create(repo, TAG_REMOTE, auth_url)?;
    info!("pushing tag '{tag}' (force={force})");

    let prefix = if force { "+" } else { "" };
    let refspec = format!("{prefix}refs/tags/{tag}:refs/tags/{tag}");
    repo.push_ref(remote.name(), &refspec, false)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
