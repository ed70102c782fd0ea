//! `gitvault plan <path>` — dry-run visibility into the next archival pass.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use gitvault_core::{ClassifiedChanges, CommitPlan, Limits};
use gitvault_git::{GitCli, Repository};
use gitvault_sync::{batch, classify};

/// Classify local changes and show the batches an archive run would commit,
/// without mutating the repository or talking to the network.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Directory to analyse.
    pub path: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PlanJson {
    deletions: Vec<String>,
    batches: Vec<BatchJson>,
    chunk_candidates: Vec<String>,
    invalid: Vec<InvalidJson>,
}

#[derive(Serialize)]
struct BatchJson {
    files: Vec<String>,
    total_bytes: u64,
}

#[derive(Serialize)]
struct InvalidJson {
    path: String,
    size: u64,
    reason: String,
}

#[derive(Tabled)]
struct BatchRow {
    #[tabled(rename = "batch")]
    index: usize,
    #[tabled(rename = "files")]
    files: usize,
    #[tabled(rename = "size (MiB)")]
    size_mib: String,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let path = self
            .path
            .canonicalize()
            .with_context(|| format!("cannot resolve path '{}'", self.path.display()))?;

        let limits = Limits::default();
        // Dry run: open-existing only, so a plain directory is never
        // turned into a repository here.
        let repo = GitCli::open_existing(&path)
            .with_context(|| format!("'{}' is not a git repository", path.display()))?;
        let status = repo.status().context("failed to read repository status")?;
        let changes = classify::classify(&path, &status, &limits)
            .context("failed to classify changed files")?;
        let plan = batch::plan(&changes.to_batch, &changes.deleted, limits.max_batch_bytes);

        if self.json {
            print_json(&changes, &plan)?;
        } else {
            print_table(&changes, &plan);
        }
        Ok(())
    }
}

fn print_json(changes: &ClassifiedChanges, plan: &CommitPlan) -> Result<()> {
    let payload = PlanJson {
        deletions: plan.deletions.clone(),
        batches: plan
            .additions
            .iter()
            .map(|b| BatchJson {
                files: b.paths.clone(),
                total_bytes: b.total_bytes,
            })
            .collect(),
        chunk_candidates: changes.to_chunk.iter().map(|r| r.path.clone()).collect(),
        invalid: changes
            .invalid
            .iter()
            .map(|f| InvalidJson {
                path: f.path.clone(),
                size: f.size,
                reason: f.reason.clone(),
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn print_table(changes: &ClassifiedChanges, plan: &CommitPlan) {
    if changes.is_empty() {
        println!("Nothing to archive — the working tree is clean.");
        return;
    }

    println!(
        "{} commit(s) planned | {} deletion(s) | {} chunk candidate(s) | {} invalid",
        plan.commit_count(),
        plan.deletions.len(),
        changes.to_chunk.len(),
        changes.invalid.len(),
    );

    if !plan.additions.is_empty() {
        let rows: Vec<BatchRow> = plan
            .additions
            .iter()
            .enumerate()
            .map(|(i, b)| BatchRow {
                index: i + 1,
                files: b.len(),
                size_mib: format!("{:.2}", b.total_bytes as f64 / (1024.0 * 1024.0)),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    for record in &changes.to_chunk {
        println!(
            "{} {} ({:.2} MiB) will be split into parts",
            "~".yellow(),
            record.path,
            record.size as f64 / (1024.0 * 1024.0)
        );
    }
    for invalid in &changes.invalid {
        println!(
            "{} {} ({:.2} MiB): {}",
            "✗".red(),
            invalid.path,
            invalid.size as f64 / (1024.0 * 1024.0),
            invalid.reason
        );
    }
}
