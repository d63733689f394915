//! Terminal front end: argument parsing, menu, rendering.

pub mod args;
pub mod menu;
pub mod render;

use indicatif::{ProgressBar, ProgressStyle};
use sheet_linker_lib::excel::ExcelError;
use sheet_linker_lib::{dispatch, dispatch_with_progress, Command, CommandOutput, LinkerContext};

/// Dispatch a command, drawing a progress bar for directory runs.
pub fn run_command(ctx: &mut LinkerContext, command: Command) -> Result<CommandOutput, ExcelError> {
    if !matches!(command, Command::ProcessDirectory { .. }) {
        return dispatch(ctx, command);
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_prefix("Processing folder");

    let output = dispatch_with_progress(ctx, command, |_, total, result| {
        bar.set_length(total as u64);
        if let Some(name) = result.input_path.file_name() {
            bar.set_message(name.to_string_lossy().into_owned());
        }
        bar.inc(1);
    });

    bar.finish_and_clear();
    output
}

/// Whether an output represents a failed run, for the process exit code.
pub fn is_failure(output: &CommandOutput) -> bool {
    match output {
        CommandOutput::File(result) => !result.is_success(),
        CommandOutput::Batch(summary) => summary.failed() > 0,
        _ => false,
    }
}
