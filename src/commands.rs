//! Command dispatcher: maps a selected command onto a core call.
//!
//! Terminal I/O lives in the binary; everything here returns values.

use serde::Serialize;
use std::path::PathBuf;

use crate::config::LinkerConfig;
use crate::context::LinkerContext;
use crate::excel::{self, BatchSummary, ConversionResult, ExcelError};
use crate::logging;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ProcessFile { path: PathBuf },
    ProcessDirectory { path: PathBuf },
    ShowConfig,
    SetConfig { key: String, value: String },
    ViewLog { lines: usize },
    RestoreBackup { backup: PathBuf, target: PathBuf },
    Exit,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutput {
    File(ConversionResult),
    Batch(BatchSummary),
    Config(LinkerConfig),
    ConfigUpdated { key: String, value: String },
    Log { lines: Vec<String> },
    Restored { backup: PathBuf, target: PathBuf },
    Exit,
}

/// Run one command against the context.
pub fn dispatch(ctx: &mut LinkerContext, command: Command) -> Result<CommandOutput, ExcelError> {
    dispatch_with_progress(ctx, command, |_, _, _| {})
}

/// Same as [`dispatch`], forwarding per-file progress of directory runs.
pub fn dispatch_with_progress<F>(
    ctx: &mut LinkerContext,
    command: Command,
    on_file: F,
) -> Result<CommandOutput, ExcelError>
where
    F: FnMut(usize, usize, &ConversionResult),
{
    match command {
        Command::ProcessFile { path } => {
            if !path.is_file() {
                return Err(ExcelError::file_not_found(&path.display().to_string()));
            }
            if !ctx.config.is_supported(&path) {
                return Err(ExcelError::invalid_input(format!(
                    "Please provide an Excel file ({})",
                    ctx.config.supported_extensions.join(", ")
                )));
            }
            Ok(CommandOutput::File(excel::process_file(ctx, &path)))
        }
        Command::ProcessDirectory { path } => {
            let summary = excel::process_directory_with_progress(ctx, &path, on_file)?;
            Ok(CommandOutput::Batch(summary))
        }
        Command::ShowConfig => Ok(CommandOutput::Config(ctx.config.clone())),
        Command::SetConfig { key, value } => {
            let mut updated = ctx.config.clone();
            updated.set(&key, &value)?;
            if let Some(ref path) = ctx.config_path {
                updated.save(path)?;
            }
            ctx.config = updated;
            tracing::info!("Configuration updated: {} = {}", key, value);

            let value = ctx
                .config
                .entries()
                .into_iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v)
                .unwrap_or(value);
            Ok(CommandOutput::ConfigUpdated { key, value })
        }
        Command::ViewLog { lines } => {
            let lines = logging::tail_log(&ctx.config.log_file, lines)?;
            Ok(CommandOutput::Log { lines })
        }
        Command::RestoreBackup { backup, target } => {
            excel::restore_backup(&backup, &target)?;
            Ok(CommandOutput::Restored { backup, target })
        }
        Command::Exit => {
            tracing::info!("=== Sheet Linker Stopped ===");
            Ok(CommandOutput::Exit)
        }
    }
}
