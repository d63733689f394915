//! Terminal rendering of dispatcher output

use colored::*;
use sheet_linker_lib::excel::{BatchSummary, ConversionResult, ExcelError};
use sheet_linker_lib::CommandOutput;

pub fn print_output(output: &CommandOutput, json: bool) {
    if json {
        match serde_json::to_string_pretty(output) {
            Ok(text) => println!("{}", text),
            Err(e) => print_error(&format!("Failed to encode output: {}", e)),
        }
        return;
    }

    match output {
        CommandOutput::File(result) => print_result(result),
        CommandOutput::Batch(summary) => print_batch(summary),
        CommandOutput::Config(config) => {
            println!();
            println!("{}", "Current Configuration:".bold());
            println!("{}", "-".repeat(40).dimmed());
            for (key, value) in config.entries() {
                println!("  {}: {}", key, value);
            }
        }
        CommandOutput::ConfigUpdated { key, value } => {
            println!("{} {} = {}", "✓".green().bold(), key, value.green());
        }
        CommandOutput::Log { lines } => {
            println!();
            println!("{}", format!("Last {} log entries:", lines.len()).bold());
            println!("{}", "=".repeat(60).dimmed());
            for line in lines {
                println!("{}", line);
            }
        }
        CommandOutput::Restored { backup, target } => {
            println!(
                "{} Restored {} from {}",
                "✓".green().bold(),
                target.display(),
                backup.display()
            );
        }
        CommandOutput::Exit => println!("Goodbye."),
    }
}

pub fn print_result(result: &ConversionResult) {
    println!();
    for line in result.report_lines() {
        if line.starts_with("Error:") {
            println!("{} {}", "✗".red().bold(), line.red());
        } else if line.starts_with("Processing:") {
            println!("{}", line.bold());
        } else if line.starts_with("Total hyperlinks created") {
            println!("{} {}", "✓".green().bold(), line.green());
        } else {
            println!("  {}", line);
        }
    }
}

pub fn print_batch(summary: &BatchSummary) {
    if summary.results.is_empty() {
        println!(
            "{} No Excel files found in {}",
            "⚠".yellow().bold(),
            summary.directory.display()
        );
        return;
    }

    for result in &summary.results {
        print_result(result);
    }

    println!();
    let line = format!(
        "Batch processing completed: {}/{} files successful, {} hyperlinks created",
        summary.succeeded(),
        summary.results.len(),
        summary.total_hyperlinks()
    );
    if summary.failed() == 0 {
        println!("{} {}", "✓".green().bold(), line.green());
    } else {
        println!("{} {}", "⚠".yellow().bold(), line.yellow());
    }
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_excel_error(err: &ExcelError) {
    print_error(&err.message);
}
