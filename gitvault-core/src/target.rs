//! Archive-target metadata — the Scanner's typed output.
//!
//! Name/version/channel extraction from folder names is out of scope; the
//! caller supplies these fields directly (CLI flags, config). This type only
//! derives the repository, branch and tag naming conventions from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What is being archived, on which distribution channel, at which version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveTarget {
    /// Stable identifier for the archived tree (drives the repo name).
    pub name: String,
    /// Candidate version string, e.g. `1.2.3` or `0.4`.
    pub version: String,
    /// Distribution channel, e.g. `pc`, `windows`, `android`.
    pub channel: String,
}

impl ArchiveTarget {
    /// Standardised remote repository name: lowercase, non `[a-z0-9-_]`
    /// characters collapsed to `-`, prefixed so archive repos are easy to
    /// spot in an account.
    pub fn repo_name(&self) -> String {
        let safe: String = self
            .name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        format!("gitvault-{safe}")
    }

    /// Tag naming convention: `v<version>-<channel>`.
    pub fn tag_name(&self) -> String {
        format!("v{}-{}", self.version, self.channel)
    }

    /// Branch naming convention: `platform/<channel>`.
    pub fn branch_name(&self) -> String {
        format!("platform/{}", self.channel)
    }
}

impl fmt::Display for ArchiveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{} ({})", self.name, self.version, self.channel)
    }
}
