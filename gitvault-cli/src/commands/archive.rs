//! `gitvault archive <path> --name ... --version ... --channel ...`

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use gitvault_core::{ArchiveTarget, Identity, Limits, PushOptions};
use gitvault_git::GitCli;
use gitvault_hub::GitHubClient;
use gitvault_sync::{archive, ArchiveReport, SyncError, TagAction};

/// Run a full archival pass over a directory.
#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// Directory to archive (becomes / continues a local repository).
    pub path: PathBuf,

    /// Stable name of the archived tree; drives the remote repository name.
    #[arg(long)]
    pub name: String,

    /// Version being archived, e.g. 1.2.3.
    #[arg(long)]
    pub version: String,

    /// Distribution channel, e.g. pc, windows, android.
    #[arg(long)]
    pub channel: String,

    /// Environment variable holding the hosting access token.
    #[arg(long, default_value = "GITVAULT_TOKEN")]
    pub token_env: String,

    /// Seconds to wait between individual pushes.
    #[arg(long, default_value_t = 60)]
    pub cooldown_secs: u64,

    /// Emit the run report as JSON instead of human output.
    #[arg(long)]
    pub json: bool,
}

impl ArchiveArgs {
    pub fn run(self) -> Result<()> {
        let token = std::env::var(&self.token_env)
            .with_context(|| format!("hosting token not found in ${}", self.token_env))?;
        let path = self
            .path
            .canonicalize()
            .with_context(|| format!("cannot resolve path '{}'", self.path.display()))?;

        let host = GitHubClient::new(token);
        let repo = GitCli::open(&path)
            .with_context(|| format!("cannot open repository at '{}'", path.display()))?;
        let target = ArchiveTarget {
            name: self.name,
            version: self.version,
            channel: self.channel,
        };
        let push = PushOptions {
            cooldown: Duration::from_secs(self.cooldown_secs),
            ..PushOptions::default()
        };

        let report = match archive(
            &repo,
            &host,
            &target,
            &Limits::default(),
            &Identity::default(),
            &push,
        ) {
            Ok(report) => report,
            Err(SyncError::InvalidFiles(files)) => {
                eprintln!("{}", "Files too large to archive:".red().bold());
                for f in &files {
                    eprintln!(
                        "  {} {} ({:.2} MiB): {}",
                        "✗".red(),
                        f.path,
                        f.size as f64 / (1024.0 * 1024.0),
                        f.reason
                    );
                }
                bail!("run aborted: {} file(s) exceed the absolute size cap", files.len());
            }
            Err(e) => return Err(e).context(format!("archive run failed for {target}")),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&target, &report);
        }
        Ok(())
    }
}

fn print_report(target: &ArchiveTarget, report: &ArchiveReport) {
    println!("{} {target} archived", "✓".green().bold());
    println!("  sync state:   {:?}", report.sync_state);
    println!(
        "  commits:      {} created, {} pushed",
        report.commits_created, report.commits_pushed
    );
    if !report.chunked_files.is_empty() {
        println!("  chunked:      {}", report.chunked_files.join(", "));
    }
    let tag_note = match report.tag_action {
        TagAction::Created => "created",
        TagAction::Moved => "moved",
        TagAction::Unchanged => "unchanged",
    };
    println!("  tag:          {} ({tag_note})", report.tag);
}
