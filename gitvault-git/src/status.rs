//! Repository status snapshot and porcelain parser.
//!
//! [`parse_porcelain`] understands `git status --porcelain -z`: NUL-separated
//! entries of the form `XY <path>`, where rename/copy entries are followed by
//! one more NUL-separated field holding the original path. The `-z` form is
//! used so paths with spaces or quotes come through unmangled.

use tracing::warn;

use crate::error::GitError;

/// A detected rename: `from` no longer exists, `to` holds the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// Working-tree status partition, rename-aware.
///
/// Paths are repository-relative, slash-separated, exactly as git reports
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoStatus {
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
    pub untracked: Vec<String>,
    pub renamed: Vec<Rename>,
    pub type_changed: Vec<String>,
    pub copied: Vec<String>,
}

impl RepoStatus {
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty()
            && self.deleted.is_empty()
            && self.untracked.is_empty()
            && self.renamed.is_empty()
            && self.type_changed.is_empty()
            && self.copied.is_empty()
    }
}

/// Parse `git status --porcelain -z` output into a [`RepoStatus`].
pub fn parse_porcelain(raw: &str) -> Result<RepoStatus, GitError> {
    let mut status = RepoStatus::default();
    let mut fields = raw.split('\0').filter(|f| !f.is_empty());

    while let Some(entry) = fields.next() {
        if entry.len() < 4 {
            return Err(GitError::Parse(format!("short status entry: '{entry}'")));
        }
        let (code, path) = entry.split_at(3);
        let mut chars = code.chars();
        let index_char = chars.next().unwrap_or(' ');
        let tree_char = chars.next().unwrap_or(' ');
        let path = path.to_string();

        if index_char == '?' {
            status.untracked.push(path);
            continue;
        }

        // Renames and copies carry the original path in the next field.
        if index_char == 'R' || index_char == 'C' {
            let from = fields
                .next()
                .ok_or_else(|| {
                    GitError::Parse(format!("rename entry without original path: '{path}'"))
                })?
                .to_string();
            if index_char == 'R' {
                status.renamed.push(Rename { from, to: path });
            } else {
                status.copied.push(path);
            }
            continue;
        }

        // Prefer the working-tree column; fall back to the index column so a
        // partially staged run still classifies everything.
        let effective = if tree_char != ' ' { tree_char } else { index_char };
        match effective {
            'M' => status.modified.push(path),
            'A' => status.modified.push(path),
            'D' => status.deleted.push(path),
            'T' => status.type_changed.push(path),
            other => warn!("unknown status code '{other}' for {path}"),
        }
    }

    Ok(status)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
