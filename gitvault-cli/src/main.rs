//! Gitvault — incremental git archival for oversized directory trees.
//!
//! # Usage
//!
//! ```text
//! gitvault archive <path> --name <name> --version <version> --channel <channel>
//! gitvault restore <path>
//! gitvault plan <path> [--json]
//! ```
//!
//! `archive` needs a hosting token in the environment (`GITVAULT_TOKEN` by
//! default); `restore` and `plan` are purely local.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{archive::ArchiveArgs, plan::PlanArgs, restore::RestoreArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "gitvault",
    version,
    about = "Archive large directory trees into size-limited git history",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a full archival pass: reconcile, commit in batches, push, tag.
    Archive(ArchiveArgs),

    /// Reassemble chunked files under a directory.
    Restore(RestoreArgs),

    /// Show what an archival pass would commit, without touching anything.
    Plan(PlanArgs),
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Archive(args) => args.run(),
        Commands::Restore(args) => args.run(),
        Commands::Plan(args) => args.run(),
    }
}
