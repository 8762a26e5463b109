//! Keystroke timing capture loop
//!
//! Three modes share the same measurement rule: take a timestamp, block on
//! the read, take another timestamp, and floor the difference to whole
//! milliseconds. The first read of a session is measured from the start of
//! the loop, so it includes however long the user took to begin typing.

use crate::clock::Clock;
use crate::error::CaptureError;
use crate::input::SymbolSource;
use crate::ledger::{DelayKey, DelayLedger};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Default end-of-session marker
pub const DEFAULT_SENTINEL: char = '.';

/// Elapsed time truncated (floored) to whole milliseconds
pub fn floor_millis(start: Duration, end: Duration) -> u64 {
    let elapsed = end.saturating_sub(start).as_millis();
    u64::try_from(elapsed).unwrap_or(u64::MAX)
}

/// Timing capture over a symbol source
pub struct StreamCapture<'a, C: Clock, S: SymbolSource> {
    clock: &'a C,
    source: S,
    sentinel: char,
}

impl<'a, C: Clock, S: SymbolSource> StreamCapture<'a, C, S> {
    pub fn new(clock: &'a C, source: S) -> Self {
        Self {
            clock,
            source,
            sentinel: DEFAULT_SENTINEL,
        }
    }

    pub fn with_sentinel(mut self, sentinel: char) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Block on the next symbol; `None` on sentinel or end of stream
    fn next_live(&mut self) -> Result<Option<char>, CaptureError> {
        match self.source.next_symbol()? {
            Some(c) if c == self.sentinel => Ok(None),
            Some(c) => Ok(Some(c)),
            None => {
                warn!(
                    "Input ended before sentinel '{}', closing session",
                    self.sentinel
                );
                Ok(None)
            }
        }
    }

    /// One timed single-symbol read
    fn timed_symbol(&mut self) -> Result<Option<(char, u64)>, CaptureError> {
        let start = self.clock.now();
        let symbol = self.next_live()?;
        let end = self.clock.now();
        Ok(symbol.map(|s| (s, floor_millis(start, end))))
    }

    /// Single-symbol mode: per-symbol delay ledger
    pub fn capture_symbols(mut self) -> Result<DelayLedger, CaptureError> {
        debug!("Starting single-symbol capture (sentinel '{}')", self.sentinel);
        let mut ledger = DelayLedger::new();
        while let Some((symbol, delay_ms)) = self.timed_symbol()? {
            trace!(symbol = %symbol, delay_ms, "keystroke");
            ledger.update(symbol, delay_ms);
        }
        debug!("Single-symbol capture finished: {} keys", ledger.len());
        Ok(ledger)
    }

    /// Pair mode: delay from the start of the first read to the end of the second
    pub fn capture_pairs(mut self) -> Result<DelayLedger, CaptureError> {
        debug!("Starting pair capture (sentinel '{}')", self.sentinel);
        let mut ledger = DelayLedger::new();
        loop {
            let start = self.clock.now();
            let Some(first) = self.next_live()? else {
                break;
            };
            let Some(second) = self.next_live()? else {
                trace!(symbol = %first, "dropping unpaired symbol");
                break;
            };
            let end = self.clock.now();

            let delay_ms = floor_millis(start, end);
            let key = DelayKey::pair(first, second);
            trace!(key = %key, delay_ms, "keystroke pair");
            ledger.update(key, delay_ms);
        }
        debug!("Pair capture finished: {} keys", ledger.len());
        Ok(ledger)
    }

    /// Simple mode: raw delays with no symbol association
    pub fn capture_delays(mut self) -> Result<Vec<u64>, CaptureError> {
        debug!("Starting simple capture (sentinel '{}')", self.sentinel);
        let mut delays = Vec::new();
        while let Some((_, delay_ms)) = self.timed_symbol()? {
            trace!(delay_ms, "keystroke");
            delays.push(delay_ms);
        }
        debug!("Simple capture finished: {} samples", delays.len());
        Ok(delays)
    }
}
