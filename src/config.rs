use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::{ReadOptions, DEFAULT_NA_VALUES};

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "data-sweeper.toml";

/// Application settings, read from an optional TOML file.
///
/// ```toml
/// preview_rows = 5
/// chart_columns = 2
/// log_level = "info"
/// na_values = ["", "NA", "null"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweeperConfig {
    /// Rows shown in each file's preview table.
    pub preview_rows: usize,
    /// Numeric columns drawn in the bar chart.
    pub chart_columns: usize,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// CSV/XLSX strings read as missing values.
    pub na_values: Vec<String>,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            chart_columns: 2,
            log_level: "info".to_string(),
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SweeperConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read `path` (or [`DEFAULT_CONFIG_FILE`]); a missing file gives defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            na_values: self.na_values.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = SweeperConfig::from_toml("preview_rows = 10\n").unwrap();
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.chart_columns, 2);
        assert_eq!(config.read_options(), ReadOptions::default());
    }

    #[test]
    fn custom_na_values() {
        let config = SweeperConfig::from_toml("na_values = [\"-\", \"?\"]\n").unwrap();
        assert_eq!(config.read_options().na_values, vec!["-", "?"]);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(SweeperConfig::from_toml("preview_rows = \"many\"").is_err());
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "chart_columns = [").unwrap();
        let err = SweeperConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("broken.toml"));
    }

    #[test]
    fn file_values_are_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweeper.toml");
        std::fs::write(&path, "chart_columns = 3\nlog_level = \"debug\"\n").unwrap();
        let config = SweeperConfig::load(Some(&path)).unwrap();
        assert_eq!(config.chart_columns, 3);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SweeperConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, SweeperConfig::default());
    }
}
