//! Turn URL and email text in spreadsheet cells into clickable hyperlinks.
//!
//! The core API is [`excel::classify`] and [`excel::convert`], with
//! [`excel::process_file`] and [`excel::process_directory`] driving the whole
//! load → backup → classify → convert → save pipeline.

pub mod commands;
pub mod config;
pub mod context;
pub mod excel;
pub mod logging;

pub use commands::{dispatch, dispatch_with_progress, Command, CommandOutput};
pub use config::LinkerConfig;
pub use context::LinkerContext;
