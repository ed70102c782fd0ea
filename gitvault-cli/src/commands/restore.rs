//! `gitvault restore <path>` — reassemble chunked files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use gitvault_chunk::join;

/// Reassemble every complete chunk group under a directory.
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Directory to scan recursively for chunk parts.
    pub path: PathBuf,
}

impl RestoreArgs {
    pub fn run(self) -> Result<()> {
        let path = self
            .path
            .canonicalize()
            .with_context(|| format!("cannot resolve path '{}'", self.path.display()))?;

        let outcome =
            join(&path).with_context(|| format!("restore failed under '{}'", path.display()))?;

        if outcome.restored.is_empty() && outcome.incomplete.is_empty() {
            println!("No chunked files found under {}", path.display());
            return Ok(());
        }

        for target in &outcome.restored {
            println!("{} {}", "✓".green(), target.display());
        }
        for target in &outcome.incomplete {
            println!("{} {} (missing parts, skipped)", "!".yellow(), target.display());
        }
        println!(
            "{} file(s) restored, {} incomplete",
            outcome.restored.len(),
            outcome.incomplete.len()
        );
        Ok(())
    }
}
