//! Clock sources for keystroke timing
//!
//! Capture code never calls `Instant::now()` directly; it asks a [`Clock`].
//! Production uses [`MonotonicClock`], tests drive capture with a
//! [`ScriptedClock`] that replays fixed timestamps.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic timestamp provider
pub trait Clock {
    /// Time elapsed since the clock's anchor
    fn now(&self) -> Duration;
}

/// Real clock anchored at construction time
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.anchor.elapsed()
    }
}

/// Deterministic clock replaying a fixed timeline
///
/// Each call to [`Clock::now`] returns the next scripted timestamp. Once the
/// script runs out the last timestamp is repeated, so a session that reads
/// more than expected measures zero delays instead of panicking.
#[derive(Debug, Clone)]
pub struct ScriptedClock {
    timeline: Vec<Duration>,
    cursor: Cell<usize>,
}

impl ScriptedClock {
    pub fn new(timeline: Vec<Duration>) -> Self {
        Self {
            timeline,
            cursor: Cell::new(0),
        }
    }

    /// Timeline given as absolute millisecond offsets
    pub fn from_millis(timestamps_ms: &[u64]) -> Self {
        Self::new(
            timestamps_ms
                .iter()
                .map(|&ms| Duration::from_millis(ms))
                .collect(),
        )
    }

    /// Timeline for back-to-back reads with the given latencies
    ///
    /// Every read is bracketed by two `now()` calls; read `i` starts where
    /// read `i - 1` ended and takes `latencies_ms[i]`.
    ///
    /// ```
    /// use keylag::clock::{Clock, ScriptedClock};
    ///
    /// let clock = ScriptedClock::from_read_latencies(&[120, 80]);
    /// let stamps: Vec<u128> = (0..4).map(|_| clock.now().as_millis()).collect();
    /// assert_eq!(stamps, vec![0, 120, 120, 200]);
    /// ```
    pub fn from_read_latencies(latencies_ms: &[u64]) -> Self {
        let mut timeline = Vec::with_capacity(latencies_ms.len() * 2);
        let mut t = 0u64;
        for &latency in latencies_ms {
            timeline.push(Duration::from_millis(t));
            t += latency;
            timeline.push(Duration::from_millis(t));
        }
        Self::new(timeline)
    }

    /// Number of timestamps handed out so far
    pub fn calls(&self) -> usize {
        self.cursor.get()
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> Duration {
        let i = self.cursor.get();
        self.cursor.set(i + 1);
        self.timeline
            .get(i)
            .or_else(|| self.timeline.last())
            .copied()
            .unwrap_or_default()
    }
}
