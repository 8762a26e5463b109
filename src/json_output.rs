//! JSON output for keystroke delay reports
//!
//! The histogram and curve sections carry index-aligned arrays that a
//! plotting tool can feed straight into a bar chart or a line plot.

use crate::binning::Bin;
use crate::rank::HistogramSeries;
use crate::session::{CaptureMode, Report};
use crate::summary::DelaySummary;
use serde::Serialize;

/// Histogram section: keys ascending by average delay
#[derive(Debug, Clone, Serialize)]
pub struct JsonHistogram {
    #[serde(flatten)]
    pub series: HistogramSeries,
    /// Occurrences per key, aligned with `keys`
    pub counts: Vec<u64>,
    pub total_samples: u64,
}

/// Curve section: bins ascending by center
#[derive(Debug, Clone, Serialize)]
pub struct JsonCurve {
    pub centers_ms: Vec<f64>,
    pub fractions: Vec<f64>,
    pub bins: Vec<Bin>,
    pub min_ms: u64,
    pub max_ms: u64,
    pub step_ms: f64,
    pub total_samples: usize,
    /// Raw delays in capture order
    pub delays_ms: Vec<u64>,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Crate version that produced the report
    pub version: String,
    /// Format name
    pub format: String,
    pub mode: CaptureMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<JsonHistogram>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<JsonCurve>,
    /// Extended delay statistics (curve reports)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<DelaySummary>,
}

impl JsonOutput {
    fn empty(mode: CaptureMode) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "keylag-json-v1".to_string(),
            mode,
            histogram: None,
            curve: None,
            summary: None,
        }
    }

    pub fn from_report(report: &Report) -> Self {
        let mut output = Self::empty(report.mode());
        match report {
            Report::Histogram {
                ledger, ranking, ..
            } => {
                let counts = ranking
                    .keys()
                    .iter()
                    .map(|k| ledger.get(k.as_str()).map_or(0, |s| s.count))
                    .collect();
                output.histogram = Some(JsonHistogram {
                    series: ranking.histogram_series(),
                    counts,
                    total_samples: ledger.totals().samples,
                });
            }
            Report::Curve {
                delays,
                distribution,
                summary,
            } => {
                let series = distribution.curve_series();
                output.curve = Some(JsonCurve {
                    centers_ms: series.centers_ms,
                    fractions: series.fractions,
                    bins: distribution.bins.clone(),
                    min_ms: distribution.min_ms,
                    max_ms: distribution.max_ms,
                    step_ms: distribution.step_ms,
                    total_samples: distribution.total_samples,
                    delays_ms: delays.clone(),
                });
                output.summary = Some(summary.clone());
            }
        }
        output
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render any report as JSON
pub fn render(report: &Report) -> anyhow::Result<String> {
    JsonOutput::from_report(report).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::bin;
    use crate::ledger::{DelayLedger, DelayStat};
    use crate::rank::rank;
    use serde_json::Value;

    fn histogram_report() -> Report {
        let ledger: DelayLedger = [
            ("a", DelayStat::new(5, 5_000)),
            ("b", DelayStat::new(3, 1_800)),
            ("c", DelayStat::new(10, 20_000)),
        ]
        .into_iter()
        .collect();
        let ranking = rank(&ledger);
        Report::Histogram {
            mode: CaptureMode::Symbols,
            ledger,
            ranking,
        }
    }

    fn curve_report() -> Report {
        let delays = vec![0, 100, 200, 300, 400, 500];
        Report::Curve {
            distribution: bin(&delays, 15).unwrap(),
            summary: DelaySummary::from_delays(&delays).unwrap(),
            delays,
        }
    }

    #[test]
    fn test_histogram_json_shape() {
        let json: Value = serde_json::from_str(&render(&histogram_report()).unwrap()).unwrap();

        assert_eq!(json["format"], "keylag-json-v1");
        assert_eq!(json["mode"], "symbols");
        assert_eq!(json["histogram"]["keys"], serde_json::json!(["b", "a", "c"]));
        assert_eq!(
            json["histogram"]["averages_ms"],
            serde_json::json!([600.0, 1000.0, 2000.0])
        );
        assert_eq!(json["histogram"]["counts"], serde_json::json!([3, 5, 10]));
        assert_eq!(json["histogram"]["total_samples"], 18);
    }

    #[test]
    fn test_histogram_omits_curve_fields() {
        let json: Value = serde_json::from_str(&render(&histogram_report()).unwrap()).unwrap();
        assert!(json.get("curve").is_none());
        assert!(json.get("summary").is_none());
    }

    #[test]
    fn test_curve_json_shape() {
        let json: Value = serde_json::from_str(&render(&curve_report()).unwrap()).unwrap();

        assert_eq!(json["mode"], "curve");
        assert!(json.get("histogram").is_none());

        let curve = &json["curve"];
        assert_eq!(curve["centers_ms"].as_array().unwrap().len(), 15);
        assert_eq!(curve["bins"].as_array().unwrap().len(), 15);
        let total: f64 = curve["fractions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(curve["max_ms"], 500);
        assert_eq!(json["summary"]["samples"], 6);
    }

    #[test]
    fn test_version_is_crate_version() {
        let output = JsonOutput::from_report(&histogram_report());
        assert_eq!(output.version, env!("CARGO_PKG_VERSION"));
    }
}
