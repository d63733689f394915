//! Excel module for turning link-like cell text into real hyperlinks.
//!
//! This module provides:
//! - URL/email pattern matching
//! - Per-column content classification
//! - Hyperlink conversion on an in-memory grid
//! - Verified, timestamped backups
//! - Single-file and directory batch processing

pub mod types;
pub mod patterns;
pub mod classifier;
pub mod converter;
pub mod reader;
pub mod writer;
pub mod backup;
pub mod batch;

// Re-export commonly used types and functions
pub use types::*;
pub use patterns::{is_email, is_url, normalize_url};
pub use classifier::{classify, classify_column};
pub use converter::convert;
pub use reader::{compute_checksum, load_workbook};
pub use writer::{is_writable, output_path_for, save_hyperlinks, HyperlinkStyle, WRITABLE_EXTENSIONS};
pub use backup::{create_backup, restore_backup};
pub use batch::{find_workbooks, process_directory, process_directory_with_progress, process_file};
