//! sheet-linker command-line entry point
//!
//! ```bash
//! sheet-linker                       # interactive menu
//! sheet-linker file contacts.xlsx    # one workbook
//! sheet-linker dir ./exports         # every workbook in a folder
//! ```

mod cli;

use clap::Parser;
use sheet_linker_lib::{config, logging, LinkerContext};
use std::process::ExitCode;

use cli::args::Cli;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = config::resolve_config_path(cli.config.as_deref());
    let mut ctx = LinkerContext::from_config_file(config_path);

    if let Err(e) = logging::init_logging(&ctx.config) {
        cli::render::print_error(&format!("Logging disabled: {}", e));
    }

    let command = cli.command.and_then(|c| c.into_command());
    let Some(command) = command else {
        cli::menu::run(&mut ctx, cli.json)?;
        return Ok(ExitCode::SUCCESS);
    };

    match cli::run_command(&mut ctx, command) {
        Ok(output) => {
            cli::render::print_output(&output, cli.json);
            if cli::is_failure(&output) {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Err(e) => {
            cli::render::print_excel_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}
