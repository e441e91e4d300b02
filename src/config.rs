//! Analysis configuration.

use crate::{CostTerm, Metric, ScoreFamily};

/// Configuration of the derived-metric engine and of the summaries built on top of it.
///
/// Instances are immutable; the `with_*` methods return a modified copy.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsConfig {
    pub(crate) static_d: f64,
    pub(crate) static_m: f64,
    pub(crate) decimal_places: u32,
    pub(crate) chosen_metric: Metric,
    pub(crate) hist_high: u64,
    pub(crate) hist_sigfig: u8,
}

impl Default for StatsConfig {
    /// The defaults are:
    /// - static coefficients D = `0.018` (cost to time) and M = `0.001` (rows to time);
    /// - derived decimals rounded to 4 places;
    /// - the static cost score as the chosen heuristic;
    /// - distribution histograms with a `hist_high` of one hour in ms and a `hist_sigfig` of 3.
    fn default() -> Self {
        Self {
            static_d: 0.018,
            static_m: 0.001,
            decimal_places: 4,
            chosen_metric: Metric::Score(ScoreFamily::Static, CostTerm::Cost),
            hist_high: 60 * 60 * 1000,
            hist_sigfig: 3,
        }
    }
}

impl StatsConfig {
    /// Creates a new [`StatsConfig`] configured the same as `self` but with the given static
    /// cost-to-time (`d`) and rows-to-time (`m`) coefficients.
    pub fn with_static_coefficients(&self, d: f64, m: f64) -> Self {
        Self {
            static_d: d,
            static_m: m,
            ..self.clone()
        }
    }

    /// Creates a new [`StatsConfig`] configured the same as `self` but rounding derived decimals
    /// to `decimal_places`.
    pub fn with_decimal_places(&self, decimal_places: u32) -> Self {
        Self {
            decimal_places,
            ..self.clone()
        }
    }

    /// Creates a new [`StatsConfig`] configured the same as `self` but with the given heuristic
    /// used for the "chosen" configuration and time.
    pub fn with_chosen_metric(&self, chosen_metric: Metric) -> Self {
        Self {
            chosen_metric,
            ..self.clone()
        }
    }

    /// Creates a new [`StatsConfig`] configured the same as `self` but with the given histogram
    /// parameters (see [hdrhistogram::Histogram::high] and [hdrhistogram::Histogram::sigfig]).
    /// `hist_high` is raised to at least 2 and `hist_sigfig` capped at 5.
    pub fn with_hist(&self, hist_high: u64, hist_sigfig: u8) -> Self {
        Self {
            hist_high: hist_high.max(2),
            hist_sigfig: hist_sigfig.min(5),
            ..self.clone()
        }
    }

    pub fn static_d(&self) -> f64 {
        self.static_d
    }

    pub fn static_m(&self) -> f64 {
        self.static_m
    }

    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    pub fn chosen_metric(&self) -> Metric {
        self.chosen_metric
    }

    pub fn hist_high(&self) -> u64 {
        self.hist_high
    }

    pub fn hist_sigfig(&self) -> u8 {
        self.hist_sigfig
    }
}
