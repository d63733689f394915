use std::path::PathBuf;

use crate::config::LinkerConfig;

/// Everything a run needs, handed explicitly to each operation.
#[derive(Debug, Clone, Default)]
pub struct LinkerContext {
    pub config: LinkerConfig,
    /// Where `config` is persisted; `None` keeps changes in memory only.
    pub config_path: Option<PathBuf>,
}

impl LinkerContext {
    pub fn new(config: LinkerConfig, config_path: Option<PathBuf>) -> Self {
        LinkerContext {
            config,
            config_path,
        }
    }

    /// Load configuration from `path` and keep the path for later saves.
    pub fn from_config_file(path: PathBuf) -> Self {
        let config = LinkerConfig::load(&path);
        LinkerContext::new(config, Some(path))
    }
}
