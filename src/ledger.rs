//! Per-key delay accumulation
//!
//! The ledger maps each symbol (or symbol pair) to a running count and a
//! running sum of its delays. Averages are derived on demand.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Accumulation bucket identifier: one symbol or a symbol pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DelayKey(String);

impl DelayKey {
    pub fn single(symbol: char) -> Self {
        Self(symbol.to_string())
    }

    pub fn pair(first: char, second: char) -> Self {
        let mut key = String::with_capacity(first.len_utf8() + second.len_utf8());
        key.push(first);
        key.push(second);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DelayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DelayKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DelayKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<char> for DelayKey {
    fn from(c: char) -> Self {
        Self::single(c)
    }
}

/// Running statistics for one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DelayStat {
    /// Number of observed occurrences
    pub count: u64,
    /// Sum of per-occurrence delays (milliseconds)
    pub total_delay_ms: u64,
}

impl DelayStat {
    pub fn new(count: u64, total_delay_ms: u64) -> Self {
        Self {
            count,
            total_delay_ms,
        }
    }

    /// Mean delay in milliseconds (0.0 for a zero count)
    pub fn average_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_delay_ms as f64 / self.count as f64
    }
}

/// Summary totals across all keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerTotals {
    pub keys: usize,
    pub samples: u64,
    pub total_delay_ms: u64,
}

/// Keyed delay accumulator
///
/// Iteration follows key order, which is also the order ties keep after
/// ranking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DelayLedger {
    stats: BTreeMap<DelayKey, DelayStat>,
}

impl DelayLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one delay observation for `key`
    pub fn update(&mut self, key: impl Into<DelayKey>, delay_ms: u64) {
        self.stats
            .entry(key.into())
            .and_modify(|stat| {
                stat.count += 1;
                stat.total_delay_ms = stat.total_delay_ms.saturating_add(delay_ms);
            })
            .or_insert(DelayStat::new(1, delay_ms));
    }

    /// Average delay per entry, in iteration order
    pub fn averages(&self) -> Vec<f64> {
        self.stats.values().map(DelayStat::average_ms).collect()
    }

    pub fn get(&self, key: &str) -> Option<&DelayStat> {
        self.stats.get(&DelayKey::from(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DelayKey, &DelayStat)> {
        self.stats.iter()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn totals(&self) -> LedgerTotals {
        self.stats.values().fold(
            LedgerTotals {
                keys: self.stats.len(),
                ..LedgerTotals::default()
            },
            |acc, stat| LedgerTotals {
                samples: acc.samples + stat.count,
                total_delay_ms: acc.total_delay_ms.saturating_add(stat.total_delay_ms),
                ..acc
            },
        )
    }
}

impl<K: Into<DelayKey>> FromIterator<(K, DelayStat)> for DelayLedger {
    fn from_iter<I: IntoIterator<Item = (K, DelayStat)>>(iter: I) -> Self {
        Self {
            stats: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
