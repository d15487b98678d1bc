//! CLI interface for fix-commit-encoding.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::correction::CorrectionTable;

pub mod config;
pub mod filter;
pub mod help;
pub mod rewrite;
pub mod scan;

pub use filter::FilterCommand;
pub use rewrite::RewriteCommand;
pub use scan::ScanCommand;

/// fix-commit-encoding: repairs mis-encoded Spanish text in commit messages.
#[derive(Parser)]
#[command(name = "fix-commit-encoding")]
#[command(
    about = "Repairs mis-encoded Spanish characters in git commit messages",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Corrects one commit message read from stdin and writes it to stdout.
    Filter(FilterCommand),
    /// Rewrites repository history with corrected commit messages.
    Rewrite(RewriteCommand),
    /// Lists commits whose messages would be corrected, in YAML format.
    Scan(ScanCommand),
    /// Correction table configuration.
    Config(config::ConfigCommand),
    /// Displays comprehensive help for all commands.
    #[command(name = "help-all")]
    HelpAll(help::HelpCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Filter(filter_cmd) => filter_cmd.execute(),
            Commands::Rewrite(rewrite_cmd) => rewrite_cmd.execute(),
            Commands::Scan(scan_cmd) => scan_cmd.execute(),
            Commands::Config(config_cmd) => config_cmd.execute(),
            Commands::HelpAll(help_cmd) => help_cmd.execute(),
        }
    }

    /// Whether errors from this command should always carry a stack backtrace.
    ///
    /// Direct history rewrites report a full trace; filter mode stays quiet so
    /// an external rewriter's output is not flooded.
    pub fn wants_backtrace(&self) -> bool {
        matches!(self.command, Commands::Rewrite(_))
    }
}

/// Correction table selection shared by commands.
#[derive(Args, Debug, Default, Clone)]
pub struct TableArgs {
    /// YAML file with extra corrections. Falls back to FIX_COMMIT_ENCODING_TABLE.
    #[arg(long, value_name = "YAML_FILE")]
    pub table: Option<PathBuf>,
}

impl TableArgs {
    /// Loads the built-in table, extended with the configured correction file if any.
    pub fn load(&self) -> Result<CorrectionTable> {
        let path = crate::utils::resolve_table_path(self.table.as_deref());
        if let Some(path) = &path {
            debug!("Using extra corrections from {}", path.display());
        }
        crate::data::load_table(path.as_deref())
    }
}
