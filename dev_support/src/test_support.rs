//! Helpers for comparing formatted statistics in tests.

/// Whether `left` and `right` differ by at most `tolerance`.
pub fn f64_within(left: f64, right: f64, tolerance: f64) -> bool {
    (left - right).abs() <= tolerance
}

/// Splits a `mean ± stdev` cell into its two numbers.
pub fn parse_spread(cell: &str) -> Option<(f64, f64)> {
    let (mean, stdev) = cell.split_once(" ± ")?;
    Some((mean.trim().parse().ok()?, stdev.trim().parse().ok()?))
}

/// Population mean and standard deviation, computed independently of the library under test.
pub fn mean_and_stdev(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}
