//! Extended statistics over raw keystroke delays
//!
//! Mean, standard deviation and extrema come from trueno's SIMD vector
//! reductions; percentiles use linear interpolation over the sorted samples.

use serde::Serialize;

/// Extended statistics for a set of delays (milliseconds)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelaySummary {
    pub samples: usize,
    pub mean: f32,
    pub stddev: f32,
    pub min: f32,
    pub max: f32,
    pub median: f32, // P50
    pub p75: f32,
    pub p90: f32,
    pub p95: f32,
    pub p99: f32,
}

impl DelaySummary {
    /// Summarize delays; `None` when there is nothing to summarize
    pub fn from_delays(delays_ms: &[u64]) -> Option<Self> {
        if delays_ms.is_empty() {
            return None;
        }

        let values: Vec<f32> = delays_ms.iter().map(|&d| d as f32).collect();
        let v = trueno::Vector::from_slice(&values);

        let mean = v.mean().unwrap_or(0.0);
        let stddev = v.stddev().unwrap_or(0.0);
        let min = v.min().unwrap_or(0.0);
        let max = v.max().unwrap_or(0.0);

        let mut sorted = values;
        sorted.sort_by(|a, b| a.total_cmp(b));

        Some(Self {
            samples: sorted.len(),
            mean,
            stddev,
            min,
            max,
            median: percentile(&sorted, 50.0),
            p75: percentile(&sorted, 75.0),
            p90: percentile(&sorted, 90.0),
            p95: percentile(&sorted, 95.0),
            p99: percentile(&sorted, 99.0),
        })
    }

    /// How many standard deviations the slowest keystroke sits above the mean
    pub fn max_sigma(&self) -> Option<f32> {
        if self.stddev > 0.0 {
            Some((self.max - self.mean) / self.stddev)
        } else {
            None
        }
    }

    pub fn is_anomalous(&self, threshold: f32) -> bool {
        self.max_sigma().is_some_and(|z| z > threshold)
    }
}

/// Linear-interpolated percentile over sorted data
fn percentile(sorted_data: &[f32], percentile: f32) -> f32 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    if sorted_data.len() == 1 {
        return sorted_data[0];
    }

    let index = (percentile / 100.0) * (sorted_data.len() - 1) as f32;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted_data[lower]
    } else {
        let weight = index - lower as f32;
        let (a, b) = (sorted_data[lower], sorted_data[upper]);
        a + (b - a) * weight
    }
}
