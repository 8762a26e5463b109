//! Error types for capture, analysis and sessions
//!
//! Every error is terminal to the current capture or analysis call and is
//! propagated to the caller; nothing here is retried.

use thiserror::Error;

/// Errors raised while reading symbols from the input stream
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Invalid UTF-8 in input stream at byte offset {offset}")]
    InvalidUtf8 { offset: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the distribution binner
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Cannot bin an empty delay sample set")]
    EmptyInput,

    #[error("Invalid bin count: {0} (must be between 1 and 10000)")]
    InvalidBinCount(usize),
}

/// Errors raised by a full capture-and-analyse session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}
