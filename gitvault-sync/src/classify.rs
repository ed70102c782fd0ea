//! Change classification: a raw status snapshot into size buckets.

use std::fs;
use std::path::Path;

use tracing::debug;

use gitvault_core::{ChangeStatus, ClassifiedChanges, FileRecord, InvalidFile, Limits};
use gitvault_git::RepoStatus;

use crate::error::{io_err, SyncError};

const MIB: u64 = 1024 * 1024;

/// Partition every changed path into exactly one bucket, sized from disk.
///
/// Modified, untracked, type-changed, copied and rename-target paths all
/// carry new content and are stat'ed; a path that vanished between the
/// status snapshot and the stat is skipped. Deletions and rename sources go
/// to the `deleted` bucket unsized. `to_batch` leaves here sorted ascending
/// by size so downstream batching is weight-balanced.
pub fn classify(
    workdir: &Path,
    status: &RepoStatus,
    limits: &Limits,
) -> Result<ClassifiedChanges, SyncError> {
    let mut pending: Vec<(&str, ChangeStatus)> = Vec::new();
    pending.extend(status.modified.iter().map(|p| (p.as_str(), ChangeStatus::Modified)));
    pending.extend(status.untracked.iter().map(|p| (p.as_str(), ChangeStatus::New)));
    pending.extend(
        status
            .type_changed
            .iter()
            .map(|p| (p.as_str(), ChangeStatus::TypeChanged)),
    );
    pending.extend(status.copied.iter().map(|p| (p.as_str(), ChangeStatus::Copied)));
    pending.extend(
        status
            .renamed
            .iter()
            .map(|r| (r.to.as_str(), ChangeStatus::Renamed)),
    );

    let mut changes = ClassifiedChanges::default();
    changes.deleted.extend(status.deleted.iter().cloned());
    changes
        .deleted
        .extend(status.renamed.iter().map(|r| r.from.clone()));

    for (rel, change_status) in pending {
        let full = workdir.join(rel);
        let size = match fs::metadata(&full) {
            Ok(meta) => meta.len(),
            // Vanished since the snapshot was taken.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{rel} disappeared after the status snapshot, skipping");
                continue;
            }
            Err(e) => return Err(io_err(&full, e)),
        };

        let record = FileRecord {
            path: rel.to_string(),
            size,
            status: change_status,
        };

        if size <= limits.max_file_bytes {
            changes.to_batch.push(record);
        } else if size <= limits.max_total_bytes {
            changes.to_chunk.push(record);
        } else {
            changes.invalid.push(InvalidFile {
                path: record.path,
                size,
                reason: format!(
                    "exceeds the {} MiB absolute limit",
                    limits.max_total_bytes / MIB
                ),
            });
        }
    }

    changes.to_batch.sort_by_key(|r| r.size);
    Ok(changes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
