//! One capture session from keystrokes to report
//!
//! A session captures in the requested mode, then runs the histogram path
//! (ledger → ranking) or the curve path (raw delays → distribution).

use crate::binning::{bin, Distribution};
use crate::capture::StreamCapture;
use crate::clock::Clock;
use crate::config::KeylagConfig;
use crate::error::{AnalysisError, SessionError};
use crate::input::SymbolSource;
use crate::ledger::DelayLedger;
use crate::rank::{rank, Ranking};
use crate::summary::DelaySummary;
use clap::ValueEnum;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// What a session captures and which report it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    /// Raw delays binned into a distribution curve
    Curve,
    /// Average delay per symbol
    Symbols,
    /// Average delay per symbol pair
    Pairs,
}

impl CaptureMode {
    /// Interactive menu numbering: 1 curve, 2 symbols, 3 pairs
    pub fn from_menu_choice(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(Self::Curve),
            2 => Some(Self::Symbols),
            3 => Some(Self::Pairs),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Curve => "curve",
            Self::Symbols => "symbols",
            Self::Pairs => "pairs",
        }
    }
}

/// Result of a finished session
#[derive(Debug, Clone)]
pub enum Report {
    Histogram {
        mode: CaptureMode,
        ledger: DelayLedger,
        ranking: Ranking,
    },
    Curve {
        delays: Vec<u64>,
        distribution: Distribution,
        summary: DelaySummary,
    },
}

impl Report {
    pub fn mode(&self) -> CaptureMode {
        match self {
            Self::Histogram { mode, .. } => *mode,
            Self::Curve { .. } => CaptureMode::Curve,
        }
    }

    /// Export file configured for this kind of report
    pub fn export_path<'c>(&self, config: &'c KeylagConfig) -> Option<&'c Path> {
        match self {
            Self::Histogram { .. } => config.histogram_export.as_deref(),
            Self::Curve { .. } => config.curve_export.as_deref(),
        }
    }
}

/// Capture keystrokes in `mode` and analyse them
///
/// # Errors
///
/// Capture errors from the source, and [`AnalysisError::EmptyInput`] when a
/// curve session ends before any keystroke was recorded.
pub fn run_session<C: Clock, S: SymbolSource>(
    mode: CaptureMode,
    clock: &C,
    source: S,
    config: &KeylagConfig,
) -> Result<Report, SessionError> {
    let capture = StreamCapture::new(clock, source).with_sentinel(config.sentinel);

    let report = match mode {
        CaptureMode::Curve => {
            let delays = capture.capture_delays()?;
            let distribution = bin(&delays, config.bin_count)?;
            let summary = DelaySummary::from_delays(&delays).ok_or(AnalysisError::EmptyInput)?;
            Report::Curve {
                delays,
                distribution,
                summary,
            }
        }
        CaptureMode::Symbols | CaptureMode::Pairs => {
            let ledger = if mode == CaptureMode::Symbols {
                capture.capture_symbols()?
            } else {
                capture.capture_pairs()?
            };
            let ranking = rank(&ledger);
            Report::Histogram {
                mode,
                ledger,
                ranking,
            }
        }
    };

    info!("Session finished in {} mode", mode.label());
    Ok(report)
}
