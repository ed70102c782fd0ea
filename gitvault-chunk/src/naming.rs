//! Chunk naming convention: `<original-name>.gc.NNN`.
//!
//! NNN is 1-indexed, zero-padded to 3 digits, contiguous with no gaps.
//! Fixed-width padding makes lexicographic order equal numeric order, which
//! the join side relies on.

/// Suffix inserted between the original name and the part number.
pub const CHUNK_SUFFIX: &str = ".gc";

/// Plain-text file left alongside chunked output; tells consumers to run
/// the join operation after downloading.
pub const RESTORE_MARKER: &str = "GITVAULT_RESTORE.txt";

/// Read block size for both split and join. Independent of the part size
/// (and typically far smaller) to bound memory.
pub(crate) const BLOCK_SIZE: usize = 5 * 1024 * 1024;

/// `video.mp4` + part 3 → `video.mp4.gc.003`.
pub fn chunk_file_name(original_name: &str, part: u32) -> String {
    format!("{original_name}{CHUNK_SUFFIX}.{part:03}")
}

/// Inverse of [`chunk_file_name`]: `video.mp4.gc.003` → (`video.mp4`, 3).
///
/// Returns `None` for names that do not end in the chunk pattern. Splits on
/// the *first* occurrence of the suffix, matching how groups are keyed.
pub fn parse_chunk_name(file_name: &str) -> Option<(String, u32)> {
    let (base, rest) = file_name.split_once(".gc.")?;
    if base.is_empty() || rest.len() != 3 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let part: u32 = rest.parse().ok()?;
    Some((base.to_string(), part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_zero_padded_and_one_indexed() {
        assert_eq!(chunk_file_name("video.mp4", 1), "video.mp4.gc.001");
        assert_eq!(chunk_file_name("video.mp4", 42), "video.mp4.gc.042");
        assert_eq!(chunk_file_name("data", 100), "data.gc.100");
    }

    #[test]
    fn parse_round_trips() {
        assert_eq!(
            parse_chunk_name("video.mp4.gc.007"),
            Some(("video.mp4".to_string(), 7))
        );
        assert_eq!(parse_chunk_name("data.gc.100"), Some(("data".to_string(), 100)));
    }

    #[test]
    fn non_chunk_names_are_rejected() {
        assert_eq!(parse_chunk_name("video.mp4"), None);
        assert_eq!(parse_chunk_name("video.mp4.gc.1"), None);
        assert_eq!(parse_chunk_name("video.mp4.gc.abc"), None);
        assert_eq!(parse_chunk_name(".gc.001"), None);
    }

    #[test]
    fn lexicographic_order_equals_numeric_order() {
        let mut names: Vec<String> = (1..=12).map(|i| chunk_file_name("f.bin", i)).collect();
        let sorted = names.clone();
        names.sort();
        assert_eq!(names, sorted);
    }
}
