//! Human-readable reports
//!
//! Histogram reports follow the strace `-c` table layout, sorted ascending by
//! average delay. Curve reports list every bin and optionally the extended
//! delay summary.

use crate::binning::Distribution;
use crate::ledger::DelayLedger;
use crate::rank::Ranking;
use crate::session::Report;
use crate::summary::DelaySummary;

/// Text rendering switches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextOptions {
    pub stats_extended: bool,
    pub anomaly_threshold: f32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            stats_extended: false,
            anomaly_threshold: 3.0,
        }
    }
}

/// Render any report as text
pub fn render(report: &Report, options: &TextOptions) -> String {
    let mut out = String::new();
    match report {
        Report::Histogram {
            ledger, ranking, ..
        } => write_histogram(&mut out, ledger, ranking),
        Report::Curve {
            delays,
            distribution,
            summary,
        } => {
            write_delays(&mut out, delays);
            write_curve(&mut out, distribution);
            if options.stats_extended {
                write_extended_summary(&mut out, summary, options.anomaly_threshold);
            }
        }
    }
    out
}

const HISTOGRAM_RULE: &str = "---------- --------- ------------ ----------------\n";

/// Per-key table in ranking order plus a total line
pub fn write_histogram(out: &mut String, ledger: &DelayLedger, ranking: &Ranking) {
    if ranking.is_empty() {
        out.push_str("No keystrokes captured.\n");
        return;
    }

    out.push_str("    avg ms     calls     total ms key\n");
    out.push_str(HISTOGRAM_RULE);

    for entry in ranking.entries() {
        let stat = ledger.get(entry.key.as_str()).copied().unwrap_or_default();
        out.push_str(&format!(
            "{:>10.2} {:>9} {:>12} {}\n",
            entry.average_ms, stat.count, stat.total_delay_ms, entry.key
        ));
    }

    let totals = ledger.totals();
    let overall = if totals.samples > 0 {
        totals.total_delay_ms as f64 / totals.samples as f64
    } else {
        0.0
    };
    out.push_str(HISTOGRAM_RULE);
    out.push_str(&format!(
        "{:>10.2} {:>9} {:>12} total\n",
        overall, totals.samples, totals.total_delay_ms
    ));
}

/// Raw delays in capture order
pub fn write_delays(out: &mut String, delays: &[u64]) {
    let joined: Vec<String> = delays.iter().map(|d| d.to_string()).collect();
    out.push_str("Delays:");
    if !joined.is_empty() {
        out.push(' ');
        out.push_str(&joined.join(" "));
    }
    out.push('\n');
}

/// One line per bin
pub fn write_curve(out: &mut String, distribution: &Distribution) {
    out.push_str(&format!(
        "\n{} samples, {} .. {} ms, bin width {:.3} ms\n\n",
        distribution.total_samples, distribution.min_ms, distribution.max_ms, distribution.step_ms
    ));
    out.push_str(" center ms   fraction     count\n");
    out.push_str("---------- ---------- ---------\n");
    for b in &distribution.bins {
        out.push_str(&format!(
            "{:>10.2} {:>10.4} {:>9}\n",
            b.center_ms, b.fraction, b.count
        ));
    }
}

/// Percentiles and the slow-keystroke anomaly flag
pub fn write_extended_summary(out: &mut String, summary: &DelaySummary, threshold: f32) {
    out.push_str(&format!(
        "\n=== Extended Statistics ({} keystrokes) ===\n\n",
        summary.samples
    ));
    let rows = [
        ("Mean:        ", summary.mean),
        ("Std Dev:     ", summary.stddev),
        ("Min:         ", summary.min),
        ("Max:         ", summary.max),
        ("Median (P50):", summary.median),
        ("P75:         ", summary.p75),
        ("P90:         ", summary.p90),
        ("P95:         ", summary.p95),
        ("P99:         ", summary.p99),
    ];
    for (label, value) in rows {
        out.push_str(&format!("  {} {:.2} ms\n", label, value));
    }

    if let Some(z) = summary.max_sigma().filter(|&z| z > threshold) {
        out.push_str(&format!(
            "  ⚠️  ANOMALY DETECTED: Slowest keystroke is {:.1}σ above mean\n",
            z
        ));
    }
}
