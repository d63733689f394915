//! Persistent settings for the linker, stored as JSON.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::excel::{ExcelError, HyperlinkStyle, WRITABLE_EXTENSIONS};

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "sheet_linker_config.json";

/// Accepted values for `log_level`
pub const LOG_LEVELS: [&str; 4] = ["DEBUG", "INFO", "WARNING", "ERROR"];

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{6}$").expect("valid colour regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerConfig {
    pub hyperlink_color: String,
    pub backup_files: bool,
    pub backup_dir: PathBuf,
    pub max_rows_to_process: u32,
    pub supported_extensions: Vec<String>,
    pub log_level: String,
    pub log_file: PathBuf,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        LinkerConfig {
            hyperlink_color: "0000FF".to_string(),
            backup_files: true,
            backup_dir: PathBuf::from("backups"),
            max_rows_to_process: 100_000,
            supported_extensions: [".xlsx", ".xlsm", ".xltx", ".xltm"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            log_level: "INFO".to_string(),
            log_file: PathBuf::from("sheet_linker.log"),
        }
    }
}

impl LinkerConfig {
    /// Load from `path`, filling missing keys with defaults.
    ///
    /// A missing file is created with the defaults. A file that cannot be parsed is left
    /// alone and the defaults are used.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            let config = LinkerConfig::default();
            match config.save(path) {
                Ok(()) => tracing::info!("Default configuration created at {}", path.display()),
                Err(e) => tracing::warn!("Could not write default config: {}", e),
            }
            return config;
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<LinkerConfig>(&raw).map_err(|e| e.to_string()));

        match parsed {
            Ok(config) => {
                tracing::info!("Configuration loaded from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Could not load config: {}. Using defaults.", e);
                LinkerConfig::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ExcelError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ExcelError::config_error(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ExcelError::config_error(format!("Failed to encode config: {}", e)))?;

        std::fs::write(path, json).map_err(|e| {
            ExcelError::config_error(format!("Failed to save config {}: {}", path.display(), e))
        })
    }

    /// Update one setting from user input, validating it first.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ExcelError> {
        let value = value.trim();

        match key {
            "hyperlink_color" => {
                if !HEX_COLOR.is_match(value) {
                    return Err(ExcelError::config_error(
                        "Invalid color format. Use 6 hex characters (e.g., 0000FF)",
                    ));
                }
                self.hyperlink_color = value.to_ascii_uppercase();
            }
            "backup_files" => {
                self.backup_files = parse_bool(value).ok_or_else(|| {
                    ExcelError::config_error(format!("Expected true or false, got '{}'", value))
                })?;
            }
            "backup_dir" => {
                if value.is_empty() {
                    return Err(ExcelError::config_error("Backup directory cannot be empty"));
                }
                self.backup_dir = PathBuf::from(value);
            }
            "max_rows_to_process" => {
                self.max_rows_to_process = value
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ExcelError::config_error("Please enter a positive number"))?;
            }
            "supported_extensions" => {
                let extensions: Vec<String> = value
                    .split(',')
                    .map(|e| e.trim().to_ascii_lowercase())
                    .filter(|e| !e.is_empty())
                    .map(|e| if e.starts_with('.') { e } else { format!(".{}", e) })
                    .collect();
                if extensions.is_empty() {
                    return Err(ExcelError::config_error("At least one extension is required"));
                }
                if let Some(bad) = extensions
                    .iter()
                    .find(|e| !WRITABLE_EXTENSIONS.contains(&e.as_str()))
                {
                    return Err(ExcelError::config_error(format!(
                        "Unsupported extension '{}'. Available: {}",
                        bad,
                        WRITABLE_EXTENSIONS.join(", ")
                    )));
                }
                self.supported_extensions = extensions;
            }
            "log_level" => {
                let level = value.to_ascii_uppercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(ExcelError::config_error(format!(
                        "Invalid log level. Available levels: {}",
                        LOG_LEVELS.join(", ")
                    )));
                }
                self.log_level = level;
            }
            "log_file" => {
                if value.is_empty() {
                    return Err(ExcelError::config_error("Log file cannot be empty"));
                }
                self.log_file = PathBuf::from(value);
            }
            other => {
                return Err(ExcelError::config_error(format!(
                    "Unknown configuration key: {}",
                    other
                )))
            }
        }

        Ok(())
    }

    /// Key/value pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("hyperlink_color", self.hyperlink_color.clone()),
            ("backup_files", self.backup_files.to_string()),
            ("backup_dir", self.backup_dir.display().to_string()),
            ("max_rows_to_process", self.max_rows_to_process.to_string()),
            ("supported_extensions", self.supported_extensions.join(", ")),
            ("log_level", self.log_level.clone()),
            ("log_file", self.log_file.display().to_string()),
        ]
    }

    pub fn hyperlink_style(&self) -> HyperlinkStyle {
        HyperlinkStyle {
            color: self.hyperlink_color.clone(),
        }
    }

    /// Case-insensitive check against `supported_extensions`.
    pub fn is_supported(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else { return false };
        let ext = format!(".{}", ext.to_string_lossy().to_ascii_lowercase());
        self.supported_extensions
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&ext))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Pick the config file: an explicit path, else the working-directory file if present,
/// else the per-user config directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return local;
    }

    dirs::config_dir()
        .map(|dir| dir.join("sheet-linker").join("config.json"))
        .unwrap_or(local)
}
