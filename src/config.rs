//! Configuration for capture sessions (keylag.toml)
//!
//! # Example keylag.toml
//!
//! ```toml
//! sentinel = "."
//! bin_count = 15
//! anomaly_threshold = 3.0
//! stats_extended = true
//! format = "json"
//! histogram_export = "histogram.json"
//! curve_export = "curve.json"
//! ```
//!
//! Every key is optional; missing keys take the [`Default`] values. Command
//! line flags override values loaded from the file.

use crate::binning::{DEFAULT_BIN_COUNT, MAX_BIN_COUNT};
use crate::capture::DEFAULT_SENTINEL;
use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Session and report settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeylagConfig {
    /// Symbol that ends a capture session
    pub sentinel: char,

    /// Number of equal-width bins for the delay distribution
    pub bin_count: usize,

    /// Flag the slowest keystroke when it sits more than this many standard
    /// deviations above the mean
    pub anomaly_threshold: f32,

    /// Print percentiles and anomaly flag in text reports
    pub stats_extended: bool,

    /// Report format
    pub format: OutputFormat,

    /// File receiving histogram reports (single-symbol and pair sessions)
    pub histogram_export: Option<PathBuf>,

    /// File receiving curve reports (simple sessions)
    pub curve_export: Option<PathBuf>,
}

impl Default for KeylagConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL,
            bin_count: DEFAULT_BIN_COUNT,
            anomaly_threshold: 3.0,
            stats_extended: false,
            format: OutputFormat::Text,
            histogram_export: None,
            curve_export: None,
        }
    }
}

impl KeylagConfig {
    /// Load and validate a TOML configuration file
    ///
    /// ```no_run
    /// use keylag::config::KeylagConfig;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = KeylagConfig::from_file("keylag.toml")?;
    /// println!("{} bins", config.bin_count);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate TOML configuration text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sentinel.is_whitespace() {
            return Err(format!(
                "sentinel must not be whitespace, got {:?}",
                self.sentinel
            ));
        }

        if self.bin_count == 0 || self.bin_count > MAX_BIN_COUNT {
            return Err(format!(
                "bin_count must be between 1 and {}, got {}",
                MAX_BIN_COUNT, self.bin_count
            ));
        }

        if !self.anomaly_threshold.is_finite() || self.anomaly_threshold < 0.0 {
            return Err(format!(
                "anomaly_threshold must be a finite value >= 0, got {}",
                self.anomaly_threshold
            ));
        }

        Ok(())
    }
}
