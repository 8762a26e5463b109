//! Ranking keys by average delay
//!
//! Entries are ordered ascending by average with a stable sort, so keys with
//! equal averages keep ledger (key) order.

use crate::ledger::{DelayKey, DelayLedger};
use serde::Serialize;

/// One ranked key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub average_ms: f64,
    pub key: DelayKey,
}

/// Histogram-shaped view: index `i` of `keys` belongs to index `i` of `averages_ms`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub keys: Vec<String>,
    pub averages_ms: Vec<f64>,
}

/// Keys ordered by ascending average delay
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Ranking {
    entries: Vec<RankedEntry>,
}

impl Ranking {
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Averages in rank order
    pub fn averages(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.average_ms).collect()
    }

    /// Keys in rank order
    pub fn keys(&self) -> Vec<&DelayKey> {
        self.entries.iter().map(|e| &e.key).collect()
    }

    pub fn histogram_series(&self) -> HistogramSeries {
        HistogramSeries {
            keys: self.entries.iter().map(|e| e.key.to_string()).collect(),
            averages_ms: self.averages(),
        }
    }
}

/// Order every ledger key by its average delay
pub fn rank(ledger: &DelayLedger) -> Ranking {
    let mut entries: Vec<RankedEntry> = ledger
        .iter()
        .map(|(key, stat)| RankedEntry {
            average_ms: stat.average_ms(),
            key: key.clone(),
        })
        .collect();

    // slice::sort_by is stable
    entries.sort_by(|a, b| a.average_ms.total_cmp(&b.average_ms));

    Ranking { entries }
}
