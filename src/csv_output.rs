//! CSV output for keystroke delay reports
//!
//! Histogram reports list keys in rank order; curve reports list bins in
//! ascending center order.

use crate::binning::Distribution;
use crate::ledger::DelayLedger;
use crate::rank::Ranking;
use crate::session::Report;

/// CSV record for one ranked key
#[derive(Debug, Clone, PartialEq)]
pub struct CsvKeyStat {
    pub key: String,
    pub count: u64,
    pub total_delay_ms: u64,
    pub average_delay_ms: f64,
}

/// CSV formatter for histogram reports
#[derive(Debug, Default)]
pub struct CsvHistogramOutput {
    stats: Vec<CsvKeyStat>,
}

impl CsvHistogramOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows in ranking order, counts looked up in the ledger
    pub fn from_ranking(ranking: &Ranking, ledger: &DelayLedger) -> Self {
        let mut output = Self::new();
        for entry in ranking.entries() {
            let stat = ledger.get(entry.key.as_str()).copied().unwrap_or_default();
            output.add_stat(CsvKeyStat {
                key: entry.key.to_string(),
                count: stat.count,
                total_delay_ms: stat.total_delay_ms,
                average_delay_ms: entry.average_ms,
            });
        }
        output
    }

    pub fn add_stat(&mut self, stat: CsvKeyStat) {
        self.stats.push(stat);
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::from("key,count,total_delay_ms,average_delay_ms\n");
        for stat in &self.stats {
            output.push_str(&escape_field(&stat.key));
            output.push(',');
            output.push_str(&stat.count.to_string());
            output.push(',');
            output.push_str(&stat.total_delay_ms.to_string());
            output.push(',');
            output.push_str(&format!("{:.3}", stat.average_delay_ms));
            output.push('\n');
        }
        output
    }
}

/// CSV formatter for curve reports
#[derive(Debug)]
pub struct CsvCurveOutput<'a> {
    distribution: &'a Distribution,
}

impl<'a> CsvCurveOutput<'a> {
    pub fn new(distribution: &'a Distribution) -> Self {
        Self { distribution }
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::from("center_ms,lower_ms,upper_ms,count,fraction\n");
        for b in &self.distribution.bins {
            output.push_str(&format!(
                "{:.3},{:.3},{:.3},{},{:.6}\n",
                b.center_ms, b.lower_ms, b.upper_ms, b.count, b.fraction
            ));
        }
        output
    }
}

/// Escape CSV field (handle commas, quotes, newlines)
///
/// Keys are raw keystrokes, so `,` and `"` are ordinary keys here.
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render any report as CSV
pub fn render(report: &Report) -> String {
    match report {
        Report::Histogram {
            ledger, ranking, ..
        } => CsvHistogramOutput::from_ranking(ranking, ledger).to_csv(),
        Report::Curve { distribution, .. } => CsvCurveOutput::new(distribution).to_csv(),
    }
}
