//! Configuration-related CLI commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::correction::CorrectionTable;
use crate::data::CorrectionFile;

/// Configuration operations.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Shows the built-in correction table as a correction file.
    Show(ShowCommand),
    /// Shows where the settings file is looked up.
    Path(PathCommand),
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {}

/// Path command options.
#[derive(Parser)]
pub struct PathCommand {}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute(),
            ConfigSubcommands::Path(path_cmd) => path_cmd.execute(),
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let file = CorrectionFile::from_table(CorrectionTable::builtin());
        println!("{}", crate::data::to_yaml(&file)?);
        Ok(())
    }
}

impl PathCommand {
    /// Executes the path command.
    pub fn execute(self) -> Result<()> {
        let path = crate::utils::Settings::get_settings_path()?;
        println!("{}", path.display());
        Ok(())
    }
}
