//! Interactive menu: a thin dialoguer adapter over the command dispatcher.

use dialoguer::{theme::ColorfulTheme, Input, Select};
use sheet_linker_lib::logging::DEFAULT_TAIL_LINES;
use sheet_linker_lib::{Command, CommandOutput, LinkerContext};
use std::path::PathBuf;

use super::{render, run_command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    ProcessFile,
    ProcessFolder,
    ViewConfig,
    UpdateConfig,
    ViewLog,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 6] = [
        MenuItem::ProcessFile,
        MenuItem::ProcessFolder,
        MenuItem::ViewConfig,
        MenuItem::UpdateConfig,
        MenuItem::ViewLog,
        MenuItem::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::ProcessFile => "Process single Excel file",
            MenuItem::ProcessFolder => "Process folder (batch mode)",
            MenuItem::ViewConfig => "View configuration",
            MenuItem::UpdateConfig => "Update configuration",
            MenuItem::ViewLog => "View log file",
            MenuItem::Exit => "Exit",
        }
    }
}

/// Settings offered by the "Update configuration" submenu
const EDITABLE_KEYS: [&str; 5] = [
    "hyperlink_color",
    "backup_files",
    "max_rows_to_process",
    "log_level",
    "backup_dir",
];

/// Source of user answers, so menu flows can run without a terminal.
pub trait Prompter {
    fn select(&mut self, prompt: &str, items: &[&str]) -> std::io::Result<Option<usize>>;
    fn input(&mut self, prompt: &str) -> std::io::Result<String>;
}

pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[&str]) -> std::io::Result<Option<usize>> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()
            .map_err(std::io::Error::other)
    }

    fn input(&mut self, prompt: &str) -> std::io::Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact_text()
            .map_err(std::io::Error::other)
    }
}

/// Ask the follow-up questions for a menu item and build its command.
///
/// `Ok(None)` means the user backed out of a submenu.
pub fn command_for<P: Prompter>(item: MenuItem, prompter: &mut P) -> std::io::Result<Option<Command>> {
    let command = match item {
        MenuItem::ProcessFile => {
            let path = prompter.input("Enter the path to your Excel file")?;
            Command::ProcessFile {
                path: PathBuf::from(path.trim()),
            }
        }
        MenuItem::ProcessFolder => {
            let path = prompter.input("Enter the folder path")?;
            Command::ProcessDirectory {
                path: PathBuf::from(path.trim()),
            }
        }
        MenuItem::ViewConfig => Command::ShowConfig,
        MenuItem::UpdateConfig => {
            let mut items: Vec<&str> = EDITABLE_KEYS.to_vec();
            items.push("Back to main menu");

            let Some(choice) = prompter.select("Update Configuration", &items)? else {
                return Ok(None);
            };
            let Some(key) = EDITABLE_KEYS.get(choice) else {
                return Ok(None);
            };

            let value = prompter.input(&format!("New value for {}", key))?;
            Command::SetConfig {
                key: key.to_string(),
                value,
            }
        }
        MenuItem::ViewLog => Command::ViewLog {
            lines: DEFAULT_TAIL_LINES,
        },
        MenuItem::Exit => Command::Exit,
    };

    Ok(Some(command))
}

/// Run the menu loop until the user exits.
pub fn run(ctx: &mut LinkerContext, json: bool) -> anyhow::Result<()> {
    let mut prompter = TerminalPrompter::new();
    let labels: Vec<&str> = MenuItem::ALL.iter().map(|i| i.label()).collect();

    println!("Excel Hyperlink Converter");
    println!("=========================");

    loop {
        println!();
        let Some(index) = prompter.select("Main Menu", &labels)? else {
            break;
        };
        let item = MenuItem::ALL[index];

        let Some(command) = command_for(item, &mut prompter)? else {
            continue;
        };

        match run_command(ctx, command) {
            Ok(output) => {
                render::print_output(&output, json);
                if matches!(output, CommandOutput::Exit) {
                    break;
                }
            }
            // Errors never end the menu loop.
            Err(e) => render::print_excel_error(&e),
        }
    }

    Ok(())
}
