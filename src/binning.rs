//! Equal-width binning of raw delays into a normalized distribution
//!
//! The range `[min, max]` of the samples is split into `bin_count` bins.
//! Bin `i` covers `[min + i*step, min + (i+1)*step)`; the last bin's upper
//! bound is pinned to `max` and is inclusive, so the maximum sample is always
//! counted. When every sample is identical the bins tile `[min, min + 1)` and
//! the first bin holds everything.
//!
//! Samples are placed by their exact integer offset from `min`, so placement
//! holds for any `u64` delay. Reported bounds and centers are absolute `f64`
//! milliseconds and lose sub-millisecond resolution above 2^53 ms.

use crate::error::AnalysisError;
use serde::Serialize;
use tracing::debug;

/// Bin count used when none is configured
pub const DEFAULT_BIN_COUNT: usize = 15;

/// Largest bin count [`bin`] accepts
pub const MAX_BIN_COUNT: usize = 10_000;

/// One interval of the distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub center_ms: f64,
    pub lower_ms: f64,
    pub upper_ms: f64,
    pub count: usize,
    /// Share of all samples falling in this bin
    pub fraction: f64,
}

/// Curve-shaped view: index `i` of `centers_ms` belongs to index `i` of `fractions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSeries {
    pub centers_ms: Vec<f64>,
    pub fractions: Vec<f64>,
}

/// Normalized delay distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub bins: Vec<Bin>,
    pub min_ms: u64,
    pub max_ms: u64,
    pub step_ms: f64,
    pub total_samples: usize,
}

impl Distribution {
    pub fn curve_series(&self) -> CurveSeries {
        CurveSeries {
            centers_ms: self.bins.iter().map(|b| b.center_ms).collect(),
            fractions: self.bins.iter().map(|b| b.fraction).collect(),
        }
    }

    /// Index of the bin a value falls in, `None` outside `[min, max]`
    pub fn locate(&self, value_ms: u64) -> Option<usize> {
        if value_ms < self.min_ms || value_ms > self.max_ms {
            return None;
        }
        Some(locate_offset(
            self.bins.len(),
            self.max_ms - self.min_ms,
            self.step_ms,
            value_ms - self.min_ms,
        ))
    }

    pub fn bin_containing(&self, value_ms: u64) -> Option<&Bin> {
        self.locate(value_ms).map(|i| &self.bins[i])
    }
}

/// Bin index for a sample `offset` ms above the minimum, `offset <= span`
fn locate_offset(bin_count: usize, span: u64, step: f64, offset: u64) -> usize {
    let last = bin_count - 1;
    // The maximum belongs to the inclusive last bin
    if span > 0 && offset == span {
        return last;
    }

    let x = offset as f64;
    let estimate = (x / step).floor();
    let mut idx = if estimate <= 0.0 {
        0
    } else {
        (estimate as usize).min(last)
    };

    // Settle float rounding in the estimate against the bin edges
    while idx > 0 && x < idx as f64 * step {
        idx -= 1;
    }
    while idx < last && x >= (idx + 1) as f64 * step {
        idx += 1;
    }
    idx
}

/// Bin raw delays into `bin_count` equal-width intervals
///
/// # Errors
///
/// [`AnalysisError::EmptyInput`] when `samples` is empty and
/// [`AnalysisError::InvalidBinCount`] when `bin_count` is zero or above
/// [`MAX_BIN_COUNT`].
///
/// # Example
///
/// ```
/// use keylag::binning::bin;
///
/// let dist = bin(&[0, 100, 200, 300, 400, 500], 15).unwrap();
/// assert_eq!(dist.bins.len(), 15);
/// assert!(dist.bin_containing(500).unwrap().count > 0);
/// ```
pub fn bin(samples: &[u64], bin_count: usize) -> Result<Distribution, AnalysisError> {
    if bin_count == 0 || bin_count > MAX_BIN_COUNT {
        return Err(AnalysisError::InvalidBinCount(bin_count));
    }
    let min_ms = *samples.iter().min().ok_or(AnalysisError::EmptyInput)?;
    let max_ms = *samples.iter().max().ok_or(AnalysisError::EmptyInput)?;

    let degenerate = max_ms == min_ms;
    let step = if degenerate {
        debug!(
            "All {} samples equal {} ms, using a unit-width range",
            samples.len(),
            min_ms
        );
        1.0 / bin_count as f64
    } else {
        (max_ms - min_ms) as f64 / bin_count as f64
    };

    let min = min_ms as f64;
    let last = bin_count - 1;
    let mut bins: Vec<Bin> = (0..bin_count)
        .map(|i| {
            let upper_ms = if i == last && !degenerate {
                max_ms as f64
            } else {
                min + (i + 1) as f64 * step
            };
            Bin {
                center_ms: min + (i as f64 + 0.5) * step,
                lower_ms: min + i as f64 * step,
                upper_ms,
                count: 0,
                fraction: 0.0,
            }
        })
        .collect();

    let span = max_ms - min_ms;
    for &sample in samples {
        let idx = locate_offset(bin_count, span, step, sample - min_ms);
        bins[idx].count += 1;
    }

    let total = samples.len() as f64;
    for b in &mut bins {
        b.fraction = b.count as f64 / total;
    }

    debug!(
        "Binned {} samples into {} bins (step {:.3} ms)",
        samples.len(),
        bin_count,
        step
    );

    Ok(Distribution {
        bins,
        min_ms,
        max_ms,
        step_ms: step,
        total_samples: samples.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fraction_sum(dist: &Distribution) -> f64 {
        dist.bins.iter().map(|b| b.fraction).sum()
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert_eq!(bin(&[], 15), Err(AnalysisError::EmptyInput));
    }

    #[test]
    fn test_zero_bins_is_an_error() {
        assert_eq!(bin(&[1, 2], 0), Err(AnalysisError::InvalidBinCount(0)));
    }

    #[test]
    fn test_bin_count_upper_limit() {
        assert_eq!(bin(&[1, 2, 3], MAX_BIN_COUNT).unwrap().bins.len(), MAX_BIN_COUNT);
        assert_eq!(
            bin(&[1, 2, 3], MAX_BIN_COUNT + 1),
            Err(AnalysisError::InvalidBinCount(MAX_BIN_COUNT + 1))
        );
        assert_eq!(
            bin(&[1, 2, 3], usize::MAX),
            Err(AnalysisError::InvalidBinCount(usize::MAX))
        );
    }

    #[test]
    fn test_huge_delays_placed_by_offset() {
        let base = 1u64 << 53;

        let dist = bin(&[base; 3], 15).unwrap();
        assert_eq!(dist.bins[0].count, 3);
        assert_eq!(dist.locate(base), Some(0));

        // step 10: offsets 0, 9, 10, 30
        let dist = bin(&[base, base + 9, base + 10, base + 30], 3).unwrap();
        let counts: Vec<usize> = dist.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1]);
        assert_eq!(dist.locate(u64::MAX), None);
    }

    #[test]
    fn test_reference_samples() {
        let dist = bin(&[0, 100, 200, 300, 400, 500], DEFAULT_BIN_COUNT).unwrap();

        assert_eq!(dist.bins.len(), 15);
        assert!((fraction_sum(&dist) - 1.0).abs() < 1e-12);
        assert!((dist.step_ms - 500.0 / 15.0).abs() < 1e-12);

        let top = dist.bin_containing(500).unwrap();
        assert_eq!(dist.locate(500), Some(14));
        assert_eq!(top.count, 1);
        assert_eq!(dist.bins[0].count, 1);
        assert_eq!(dist.bins.iter().map(|b| b.count).sum::<usize>(), 6);
    }

    #[test]
    fn test_centers_are_midpoints() {
        let dist = bin(&[10, 40], 3).unwrap();
        let centers = dist.curve_series().centers_ms;
        assert_eq!(centers, vec![15.0, 25.0, 35.0]);
    }

    #[test]
    fn test_half_open_bounds() {
        // step 10: [0,10) [10,20) [20,30]
        let dist = bin(&[0, 10, 10, 19, 20, 30], 3).unwrap();
        let counts: Vec<usize> = dist.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 3, 2]);
    }

    #[test]
    fn test_maximum_is_captured_despite_rounding() {
        // (max - min) / 7 is not exactly representable
        let dist = bin(&[0, 1, 2, 3, 4, 5, 6, 100], 7).unwrap();
        assert_eq!(dist.bins[6].upper_ms, 100.0);
        assert_eq!(dist.bins[6].count, 1);
        assert!((fraction_sum(&dist) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_range_single_bin_holds_everything() {
        let dist = bin(&[42, 42, 42], 15).unwrap();

        assert_eq!(dist.bins.len(), 15);
        assert_eq!(dist.bins[0].count, 3);
        assert_eq!(dist.bins[0].fraction, 1.0);
        assert!(dist.bins[1..].iter().all(|b| b.count == 0));
        assert!(dist
            .bins
            .windows(2)
            .all(|w| w[0].center_ms < w[1].center_ms));
    }

    #[test]
    fn test_single_sample() {
        let dist = bin(&[7], 4).unwrap();
        assert_eq!(dist.bins[0].fraction, 1.0);
        assert_eq!(dist.locate(7), Some(0));
    }

    #[test]
    fn test_single_bin() {
        let dist = bin(&[5, 10, 15], 1).unwrap();
        assert_eq!(dist.bins.len(), 1);
        assert_eq!(dist.bins[0].count, 3);
        assert_eq!(dist.bins[0].center_ms, 10.0);
    }

    #[test]
    fn test_locate_outside_range() {
        let dist = bin(&[10, 20], 2).unwrap();
        assert_eq!(dist.locate(9), None);
        assert_eq!(dist.locate(21), None);
        assert_eq!(dist.locate(15), Some(1));
    }

    #[test]
    fn test_curve_series_is_index_aligned() {
        let dist = bin(&[1, 2, 3, 4, 5, 6, 7, 8, 9], 4).unwrap();
        let series = dist.curve_series();
        assert_eq!(series.centers_ms.len(), series.fractions.len());
        assert!((series.fractions.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }
}
