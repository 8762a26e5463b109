//! CLI argument parsing for keylag

use crate::session::CaptureMode;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// Output format for capture reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables on stderr (default)
    Text,
    /// JSON for plotting tools and machine parsing
    Json,
    /// CSV for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "keylag")]
#[command(version)]
#[command(about = "Keystroke delay capture with per-key ranking and delay distribution", long_about = None)]
pub struct Cli {
    /// Run one capture session in this mode instead of the interactive menu
    #[arg(short = 'm', long = "mode", value_enum)]
    pub mode: Option<CaptureMode>,

    /// Output format (overrides the config file)
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Number of bins for the delay distribution (overrides the config file)
    #[arg(short = 'b', long = "bins", value_name = "N")]
    pub bins: Option<usize>,

    /// Symbol that ends a capture session (overrides the config file)
    #[arg(long = "sentinel", value_name = "CHAR")]
    pub sentinel: Option<char>,

    /// Also write the rendered report to this file
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Load settings from a TOML file
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show percentiles and anomaly detection in text reports
    #[arg(long = "stats-extended")]
    pub stats_extended: bool,

    /// Anomaly threshold in standard deviations (overrides the config file)
    #[arg(long = "anomaly-threshold", value_name = "SIGMA")]
    pub anomaly_threshold: Option<f32>,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
