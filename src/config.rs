use crate::categories::CategoryTable;
use crate::errors::ConfigError;
use crate::layout::{Labels, Layout};
use crate::pdf::FontConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_REPORT_DIR: &str = "reports";

/// Settings read from the JSON configuration file. Every field is optional
/// in the file and falls back to its default.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding `<name>.csv` reports and their exported PDFs.
    pub report_dir: PathBuf,
    pub categories: CategoryTable,
    pub fonts: FontConfig,
    pub layout: Layout,
    pub labels: Labels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            categories: CategoryTable::default(),
            fonts: FontConfig::default(),
            layout: Layout::default(),
            labels: Labels::default(),
        }
    }
}

impl Config {
    /// Loads the configuration at `path`, or the defaults when the file does
    /// not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
    }
}
