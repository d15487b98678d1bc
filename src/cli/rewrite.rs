//! Rewrite command: corrects commit messages across the repository history.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::cli::TableArgs;
use crate::git::{HistoryRewriter, RewriteSummary};

/// Rewrite command options.
#[derive(Parser)]
pub struct RewriteCommand {
    /// Repository to rewrite.
    #[arg(short = 'C', long = "repo", value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,

    /// Rewrites even when tracked files have uncommitted changes.
    #[arg(long)]
    pub force: bool,

    /// Keeps the previous target of every moved reference under refs/original/.
    #[arg(long)]
    pub backup: bool,

    /// Reference to rewrite; may be repeated. Defaults to every local branch and tag.
    #[arg(long = "ref", value_name = "REF")]
    pub refs: Vec<String>,

    /// Correction table selection.
    #[command(flatten)]
    pub table: TableArgs,
}

impl RewriteCommand {
    /// Executes the rewrite command.
    pub fn execute(self) -> Result<()> {
        println!("🔄 Starting commit message correction...");
        println!("This may take several minutes...");
        println!();

        let summary = self.run()?;

        println!();
        println!(
            "Visited {} commits, corrected {} messages, rewrote {} commits",
            summary.commits_visited, summary.messages_changed, summary.commits_rewritten
        );
        for name in &summary.refs_updated {
            println!("  updated {name}");
        }
        println!("✅ Process completed successfully!");
        println!();
        println!("Verify the commits with: git log --oneline -10");

        Ok(())
    }

    /// Runs the rewrite session without printing progress.
    pub fn run(self) -> Result<RewriteSummary> {
        let table = self.table.load()?;
        let repo = crate::utils::check_rewrite_prerequisites(&self.repo, self.force)?;

        HistoryRewriter::new(&repo)
            .with_refs(self.refs)
            .with_backup(self.backup)
            .run(|message, commit| {
                let fixed = table.apply(message);
                if fixed != message {
                    debug!("Correcting message of {}", commit.short_hash());
                }
                fixed.into_owned()
            })
            .context("Failed to rewrite commit messages")
    }
}
