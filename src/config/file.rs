//! Configuration file data structures

use crate::engine::DEFAULT_MOVE_TOLERANCE;
use crate::error::SizeAnalyzerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".size-analyzer.toml";

/// Default directory holding the index and per-platform CSVs
pub const DEFAULT_DATA_DIR: &str = "size-analyzer";

/// Default index file name inside the data directory
pub const DEFAULT_INDEX_FILE: &str = "analysis_index.json";

/// Default number of versions offered by `recent`
pub const DEFAULT_RECENT_VERSIONS: usize = 10;

/// size-analyzer configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    /// Directory holding `<platform>/<version>.csv` snapshots
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Index file name, relative to `data_dir`
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Minimum absolute byte delta counted as a change
    #[serde(default)]
    pub threshold: u64,

    /// Metric compared when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,

    /// Relative size tolerance for move detection
    #[serde(default = "default_move_tolerance")]
    pub move_tolerance: f64,

    /// How many versions the default range covers
    #[serde(default = "default_recent_versions")]
    pub recent_versions: usize,

    /// Size budget settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<SizeBudget>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_index_file() -> String {
    DEFAULT_INDEX_FILE.to_string()
}

fn default_move_tolerance() -> f64 {
    DEFAULT_MOVE_TOLERANCE
}

fn default_recent_versions() -> usize {
    DEFAULT_RECENT_VERSIONS
}

/// Size budget limits checked by `compare --check`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SizeBudget {
    /// Largest allowed growth of a single file, in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_increase_bytes: Option<u64>,

    /// Largest allowed growth of the whole snapshot, in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_total_increase_bytes: Option<u64>,
}

impl SizeBudget {
    /// Whether no limit is set
    pub fn is_empty(&self) -> bool {
        self.max_increase_bytes.is_none() && self.max_total_increase_bytes.is_none()
    }

    /// Validate that configured limits are positive
    pub fn validate(&self) -> Result<(), SizeAnalyzerError> {
        for (key, value) in [
            ("max-increase-bytes", self.max_increase_bytes),
            ("max-total-increase-bytes", self.max_total_increase_bytes),
        ] {
            if value == Some(0) {
                return Err(SizeAnalyzerError::InvalidConfig {
                    reason: format!("budget.{} must be greater than 0", key),
                });
            }
        }
        Ok(())
    }
}

impl ConfigFile {
    /// Path of the analysis index
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_file)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), SizeAnalyzerError> {
        if !(0.0..=1.0).contains(&self.move_tolerance) {
            return Err(SizeAnalyzerError::InvalidConfig {
                reason: format!(
                    "move-tolerance must be within [0, 1], got {}",
                    self.move_tolerance
                ),
            });
        }
        if self.recent_versions < 2 {
            return Err(SizeAnalyzerError::InvalidConfig {
                reason: format!(
                    "recent-versions must be at least 2, got {}",
                    self.recent_versions
                ),
            });
        }
        if self.index_file.trim().is_empty() {
            return Err(SizeAnalyzerError::InvalidConfig {
                reason: "index-file must not be empty".to_string(),
            });
        }
        if let Some(budget) = &self.budget {
            budget.validate()?;
        }
        Ok(())
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            index_file: default_index_file(),
            threshold: 0,
            metric: None,
            move_tolerance: DEFAULT_MOVE_TOLERANCE,
            recent_versions: DEFAULT_RECENT_VERSIONS,
            budget: None,
        }
    }
}
