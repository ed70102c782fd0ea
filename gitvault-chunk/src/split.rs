//! Split one oversized file into fixed-size numbered parts.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::error::{io_err, ChunkError};
use crate::naming::{chunk_file_name, BLOCK_SIZE};

/// Split `file_path` into parts of at most `part_size` bytes, written next
/// to it as `<name>.gc.NNN`.
///
/// Each part is written to a `.tmp` sibling and renamed into place; the
/// original is deleted only after every part is durably renamed. On any
/// failure mid-split all parts produced so far are removed and the original
/// is left untouched, so the operation is all-or-nothing for the caller.
pub fn split(file_path: &Path, part_size: u64) -> Result<Vec<PathBuf>, ChunkError> {
    if part_size == 0 {
        return Err(ChunkError::ZeroPartSize {
            path: file_path.to_path_buf(),
        });
    }
    let meta = fs::metadata(file_path).map_err(|e| io_err(file_path, e))?;
    let file_size = meta.len();
    if file_size == 0 {
        return Err(ChunkError::EmptySource {
            path: file_path.to_path_buf(),
        });
    }
    let total_parts = file_size.div_ceil(part_size);

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io_err(
                file_path,
                std::io::Error::other("split source has no file name"),
            )
        })?;
    let parent = file_path.parent().unwrap_or_else(|| Path::new("."));

    info!(
        "splitting {} ({:.2} MiB) into {} parts",
        file_name,
        file_size as f64 / (1024.0 * 1024.0),
        total_parts
    );

    let mut created: Vec<PathBuf> = Vec::with_capacity(total_parts as usize);
    let result = write_parts(
        file_path,
        parent,
        &file_name,
        part_size,
        total_parts,
        &mut created,
    );

    match result {
        Ok(()) => {
            // Every part is in place under its final name; the original can go.
            fs::remove_file(file_path).map_err(|e| {
                cleanup_parts(&created);
                io_err(file_path, e)
            })?;
            info!("split complete, original '{file_name}' removed");
            Ok(created)
        }
        Err(e) => {
            error!("split of '{file_name}' failed: {e}");
            cleanup_parts(&created);
            Err(e)
        }
    }
}

fn write_parts(
    file_path: &Path,
    parent: &Path,
    file_name: &str,
    part_size: u64,
    total_parts: u64,
    created: &mut Vec<PathBuf>,
) -> Result<(), ChunkError> {
    let mut source = File::open(file_path).map_err(|e| io_err(file_path, e))?;
    let mut block = vec![0u8; BLOCK_SIZE];

    for part in 1..=total_parts {
        let final_path = parent.join(chunk_file_name(file_name, part as u32));
        let tmp_path = PathBuf::from(format!("{}.tmp", final_path.display()));

        let mut out = File::create(&tmp_path).map_err(|e| io_err(&tmp_path, e))?;
        let mut remaining = part_size;
        while remaining > 0 {
            let want = remaining.min(BLOCK_SIZE as u64) as usize;
            let read = source
                .read(&mut block[..want])
                .map_err(|e| io_err(file_path, e))?;
            if read == 0 {
                break;
            }
            out.write_all(&block[..read]).map_err(|e| io_err(&tmp_path, e))?;
            remaining -= read as u64;
        }
        drop(out);

        if final_path.exists() {
            displace(&final_path)?;
        }
        fs::rename(&tmp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            io_err(&final_path, e)
        })?;
        created.push(final_path);
        debug!("part written: {}", chunk_file_name(file_name, part as u32));
    }

    Ok(())
}

/// Move an existing file aside instead of deleting it in place.
pub(crate) fn displace(path: &Path) -> Result<(), ChunkError> {
    let aside = PathBuf::from(format!("{}.displaced", path.display()));
    fs::rename(path, &aside).map_err(|e| io_err(path, e))
}

fn cleanup_parts(created: &[PathBuf]) {
    for part in created {
        if part.exists() {
            let _ = fs::remove_file(part);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
