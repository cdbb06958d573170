use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_MATURATION_DELAY_MS, DEFAULT_SETTLE_DELAY_MS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Engine configuration, loadable from a JSON file. Missing keys take the
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    /// How long a new leaf stays in the placing phase
    pub settle_delay_ms: u64,
    /// How long a quiet thought takes to become a mushroom
    pub maturation_delay_ms: u64,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            maturation_delay_ms: DEFAULT_MATURATION_DELAY_MS,
        }
    }

    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Defaults with the data directory taken from `CROWDSKIN_DATA_DIR`, or
    /// the platform data directory when unset.
    pub fn from_env() -> Self {
        let data_dir = std::env::var_os("CROWDSKIN_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|dir| dir.join("crowdskin")))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self::new(data_dir)
    }

    pub fn settle_delay(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.settle_delay_ms as i64)
    }

    pub fn maturation_delay(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.maturation_delay_ms as i64)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}
