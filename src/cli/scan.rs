//! Scan command: previews corrections without touching history.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::TableArgs;
use crate::data::ScanReport;

/// Scan command options.
#[derive(Parser)]
pub struct ScanCommand {
    /// Commit range to scan (e.g., HEAD~10..HEAD, abc123). Defaults to all history of HEAD.
    #[arg(value_name = "COMMIT_RANGE")]
    pub commit_range: Option<String>,

    /// Repository to scan.
    #[arg(short = 'C', long = "repo", value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,

    /// Correction table selection.
    #[command(flatten)]
    pub table: TableArgs,
}

impl ScanCommand {
    /// Executes the scan command.
    pub fn execute(self) -> Result<()> {
        let report = self.build_report()?;
        let yaml_output = crate::data::to_yaml(&report)?;
        println!("{yaml_output}");
        Ok(())
    }

    /// Builds the report for the selected commits.
    pub fn build_report(&self) -> Result<ScanReport> {
        let table = self.table.load()?;
        let repo = crate::utils::check_git_repository(&self.repo)?;

        let commits = match &self.commit_range {
            Some(range) => repo.get_commits_in_range(range)?,
            None => repo
                .get_history("HEAD")
                .context("Failed to read history of HEAD")?,
        };

        ScanReport::from_commits(&table, &commits)
    }
}
