//! Reassemble chunk groups found under a directory tree.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::{io_err, ChunkError};
use crate::naming::{parse_chunk_name, BLOCK_SIZE};
use crate::split::displace;

/// What a [`join`] pass did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Targets fully reconstructed (chunk parts removed).
    pub restored: Vec<PathBuf>,
    /// Targets skipped because their chunk group had missing parts.
    pub incomplete: Vec<PathBuf>,
}

/// Scan `dir` recursively for `*.gc.NNN` files and reassemble every complete
/// group into its original file.
///
/// Groups are keyed by the reconstructed target path and sorted
/// lexicographically (equivalent to numeric order given the fixed-width
/// part numbers). A group whose part count does not match the numeric
/// suffix of its last member is logged and skipped — never partially
/// joined. For complete groups the parts are concatenated into a temporary
/// sibling, an empty result is rejected, any pre-existing target is moved
/// aside, and only after the rename are the parts removed.
pub fn join(dir: &Path) -> Result<JoinOutcome, ChunkError> {
    let mut groups: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    collect_chunks(dir, &mut groups)?;

    if groups.is_empty() {
        info!("no chunked files found under {}", dir.display());
        return Ok(JoinOutcome::default());
    }

    let mut outcome = JoinOutcome::default();
    for (target, mut parts) in groups {
        parts.sort();

        let last_name = parts
            .last()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let expected = parse_chunk_name(&last_name).map(|(_, n)| n).unwrap_or(0);

        if parts.len() as u32 != expected {
            warn!(
                "incomplete chunk group for {}: expected {} parts, found {}",
                target.display(),
                expected,
                parts.len()
            );
            outcome.incomplete.push(target);
            continue;
        }

        info!(
            "restoring '{}' from {} parts",
            target.display(),
            parts.len()
        );
        join_group(&target, &parts)?;
        outcome.restored.push(target);
    }

    Ok(outcome)
}

fn collect_chunks(
    dir: &Path,
    groups: &mut BTreeMap<PathBuf, Vec<PathBuf>>,
) -> Result<(), ChunkError> {
    for entry in fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_chunks(&path, groups)?;
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some((base, _)) = parse_chunk_name(&name) {
            let target = path.parent().unwrap_or(dir).join(base);
            groups.entry(target).or_default().push(path);
        }
    }
    Ok(())
}

fn join_group(target: &Path, parts: &[PathBuf]) -> Result<(), ChunkError> {
    let tmp_path = PathBuf::from(format!("{}.gc.tmp", target.display()));

    let written = concat_parts(&tmp_path, parts).inspect_err(|e| {
        error!("failed to join {}: {e}", target.display());
        let _ = fs::remove_file(&tmp_path);
    })?;

    if written == 0 {
        let _ = fs::remove_file(&tmp_path);
        return Err(ChunkError::EmptyJoin {
            path: target.to_path_buf(),
        });
    }

    if target.exists() {
        displace(target)?;
    }
    fs::rename(&tmp_path, target).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_err(target, e)
    })?;

    // Only now is it safe to drop the parts.
    for part in parts {
        fs::remove_file(part).map_err(|e| io_err(part, e))?;
    }

    info!("restored {}", target.display());
    Ok(())
}

fn concat_parts(tmp_path: &Path, parts: &[PathBuf]) -> Result<u64, ChunkError> {
    let mut out = File::create(tmp_path).map_err(|e| io_err(tmp_path, e))?;
    let mut block = vec![0u8; BLOCK_SIZE];
    let mut written: u64 = 0;

    for part in parts {
        let mut reader = File::open(part).map_err(|e| io_err(part, e))?;
        loop {
            let read = reader.read(&mut block).map_err(|e| io_err(part, e))?;
            if read == 0 {
                break;
            }
            out.write_all(&block[..read]).map_err(|e| io_err(tmp_path, e))?;
            written += read as u64;
        }
    }

    Ok(written)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
