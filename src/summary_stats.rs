use crate::round_to;
use hdrhistogram::Histogram;
use std::fmt;

/// Common summary statistics of a distribution of non-negative integer observations.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub count: u64,
    pub mean: f64,
    pub stdev: f64,
    pub min: u64,
    pub p1: u64,
    pub p5: u64,
    pub p10: u64,
    pub p25: u64,
    pub median: u64,
    pub p75: u64,
    pub p90: u64,
    pub p95: u64,
    pub p99: u64,
    pub max: u64,
}

/// Headers matching the fields of [`SummaryStats`], in order.
pub const SUMMARY_STATS_HEADERS: [&str; 14] = [
    "count", "mean", "stdev", "min", "p1", "p5", "p10", "p25", "median", "p75", "p90", "p95",
    "p99", "max",
];

impl SummaryStats {
    /// Computes summary statistics from the given histogram.
    pub fn new(hist: &Histogram<u64>) -> Self {
        Self {
            count: hist.len(),
            mean: hist.mean(),
            stdev: hist.stdev(),
            min: hist.min(),
            p1: hist.value_at_quantile(0.01),
            p5: hist.value_at_quantile(0.05),
            p10: hist.value_at_quantile(0.10),
            p25: hist.value_at_quantile(0.25),
            median: hist.value_at_quantile(0.50),
            p75: hist.value_at_quantile(0.75),
            p90: hist.value_at_quantile(0.90),
            p95: hist.value_at_quantile(0.95),
            p99: hist.value_at_quantile(0.99),
            max: hist.max(),
        }
    }

    /// Cells in [`SUMMARY_STATS_HEADERS`] order, with mean and stdev rounded to `places`.
    pub fn cells(&self, places: u32) -> Vec<String> {
        let SummaryStats {
            count,
            mean,
            stdev,
            min,
            p1,
            p5,
            p10,
            p25,
            median,
            p75,
            p90,
            p95,
            p99,
            max,
        } = self;

        let mut cells = vec![
            count.to_string(),
            round_to(*mean, places).to_string(),
            round_to(*stdev, places).to_string(),
        ];
        cells.extend([min, p1, p5, p10, p25, median, p75, p90, p95, p99, max].map(u64::to_string));
        cells
    }
}

/// Constructs an auto-resizing histogram. The arguments correspond to [Histogram::high] and
/// [Histogram::sigfig]; `hist_high` is raised to at least 2 and `hist_sigfig` capped at 5, the
/// bounds `hdrhistogram` accepts.
pub fn new_histogram(hist_high: u64, hist_sigfig: u8) -> Histogram<u64> {
    let mut hist = Histogram::<u64>::new_with_bounds(1, hist_high.max(2), hist_sigfig.min(5))
        .expect("should not happen given histogram construction");
    hist.auto(true);
    hist
}

/// Computes a [`SummaryStats`] from `values` recorded into a histogram with the given bounds.
pub fn summary_stats(
    values: impl IntoIterator<Item = u64>,
    hist_high: u64,
    hist_sigfig: u8,
) -> SummaryStats {
    let mut hist = new_histogram(hist_high, hist_sigfig);
    for value in values {
        hist.record(value)
            .expect("auto-resizing histogram accepts any u64 value");
    }
    SummaryStats::new(&hist)
}

//=================
// Spread

/// Exact mean and population standard deviation of signed or fractional observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    pub count: usize,
    pub mean: f64,
    pub stdev: f64,
}

impl Spread {
    /// `None` when `values` is empty.
    pub fn new(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            count: values.len(),
            mean,
            stdev: variance.sqrt(),
        })
    }

    /// Formats as `mean ± stdev` with both rounded to `places`.
    pub fn display(&self, places: u32) -> SpreadDisplay {
        SpreadDisplay {
            mean: round_to(self.mean, places),
            stdev: round_to(self.stdev, places),
        }
    }
}

pub struct SpreadDisplay {
    mean: f64,
    stdev: f64,
}

impl fmt::Display for SpreadDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ± {}", self.mean, self.stdev)
    }
}
