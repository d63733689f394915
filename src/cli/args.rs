//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use sheet_linker_lib::logging::DEFAULT_TAIL_LINES;
use sheet_linker_lib::Command;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheet-linker")]
#[command(about = "Convert URL and email text in Excel cells into clickable hyperlinks")]
#[command(
    long_about = r#"Convert URL and email text in Excel cells into clickable hyperlinks

USAGE:
  sheet-linker                      # Interactive menu
  sheet-linker file contacts.xlsx   # Convert one workbook
  sheet-linker dir ./exports        # Convert every workbook in a folder
  sheet-linker config show          # Show current configuration

Each input produces <name>_with_hyperlinks.<ext> next to it and a backup
under the configured backup directory."#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a single workbook
    File {
        /// Workbook to convert
        path: PathBuf,
    },

    /// Convert every workbook in a folder (non-recursive)
    Dir {
        /// Folder to scan
        path: PathBuf,
    },

    /// View or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show the end of the log file
    Log {
        /// Number of lines to show
        #[arg(long, short = 'n', default_value_t = DEFAULT_TAIL_LINES)]
        lines: usize,
    },

    /// Copy a backup back over a file
    Restore {
        /// Backup file to restore from
        backup: PathBuf,
        /// File to overwrite
        target: PathBuf,
    },

    /// Interactive menu (default)
    Menu,
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Display current configuration settings
    Show,

    /// Change one setting
    Set {
        /// Setting name, e.g. hyperlink_color
        key: String,
        /// New value
        value: String,
    },
}

impl Commands {
    /// The dispatcher command for this subcommand; `None` for the interactive menu.
    pub fn into_command(self) -> Option<Command> {
        match self {
            Commands::File { path } => Some(Command::ProcessFile { path }),
            Commands::Dir { path } => Some(Command::ProcessDirectory { path }),
            Commands::Config { action } => Some(match action {
                ConfigAction::Show => Command::ShowConfig,
                ConfigAction::Set { key, value } => Command::SetConfig { key, value },
            }),
            Commands::Log { lines } => Some(Command::ViewLog { lines }),
            Commands::Restore { backup, target } => Some(Command::RestoreBackup { backup, target }),
            Commands::Menu => None,
        }
    }
}
