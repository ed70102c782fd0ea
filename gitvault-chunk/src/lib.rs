//! # gitvault-chunk
//!
//! Fixed-size file chunking and reassembly.
//!
//! Oversized files are split into numbered parts named
//! `<original-name>.gc.NNN` (1-indexed, zero-padded to 3 digits) next to the
//! original, which is deleted only once every part is durably in place.
//! [`join`] reverses the operation for every complete chunk group under a
//! directory. Both directions stage output in a temporary sibling file and
//! rename into place, so a crash never leaves a half-written artifact under
//! the final name.

pub mod error;
pub mod join;
pub mod naming;
pub mod split;

pub use error::ChunkError;
pub use join::{join, JoinOutcome};
pub use naming::{chunk_file_name, parse_chunk_name, CHUNK_SUFFIX, RESTORE_MARKER};
pub use split::split;

use std::path::{Path, PathBuf};

use crate::error::io_err;

/// Write the restore marker next to chunked output, telling whoever clones
/// the archive how to reassemble it. Returns the marker path.
pub fn write_restore_marker(dir: &Path) -> Result<PathBuf, ChunkError> {
    let path = dir.join(RESTORE_MARKER);
    let text = "This archive contains chunked files (+chunked).\n\
                Run `gitvault restore .` after downloading to reassemble them.\n";
    std::fs::write(&path, text).map_err(|e| io_err(&path, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn restore_marker_is_written_in_place() {
        let tmp = TempDir::new().unwrap();
        let path = write_restore_marker(tmp.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), RESTORE_MARKER);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("gitvault restore"));
    }
}
