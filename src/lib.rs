//! keylag - keystroke timing capture and delay analysis
//!
//! This library captures inter-keystroke delays from a blocking symbol
//! stream, accumulates them per symbol or symbol pair, ranks keys by average
//! delay, and bins raw delays into a normalized distribution. Reports are
//! exported as plain data (text, JSON, CSV) for an external plotter.

pub mod binning;
pub mod capture;
pub mod cli;
pub mod clock;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod input;
pub mod json_output;
pub mod ledger;
pub mod rank;
pub mod session;
pub mod summary;
pub mod text_output;
