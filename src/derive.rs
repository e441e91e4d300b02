//! Derived columns: costs, empirical ratios, total time and score variants.

use crate::{round_to, Observed, ParseContext, RunRow, StatsConfig, StatsError, Value, BASE_WIDTH};
use std::{fmt, str::FromStr};

//=================
// Metrics

/// Where a score takes its D (cost-to-time) and M (rows-to-time) coefficients from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreFamily {
    /// The row's own empirical ratios.
    Ideal,
    /// The configured static coefficients.
    Static,
}

/// Cost-like term a score is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CostTerm {
    Cost,
    NonStartup,
    Combined,
}

/// A value rows are ranked by: the empirical total time or one of the scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Actual,
    Score(ScoreFamily, CostTerm),
}

pub const SCORES: [(ScoreFamily, CostTerm); 6] = [
    (ScoreFamily::Ideal, CostTerm::Cost),
    (ScoreFamily::Ideal, CostTerm::NonStartup),
    (ScoreFamily::Ideal, CostTerm::Combined),
    (ScoreFamily::Static, CostTerm::Cost),
    (ScoreFamily::Static, CostTerm::NonStartup),
    (ScoreFamily::Static, CostTerm::Combined),
];

/// Ranking metrics in declared column order.
pub const METRICS: [Metric; 7] = [
    Metric::Actual,
    Metric::Score(ScoreFamily::Ideal, CostTerm::Cost),
    Metric::Score(ScoreFamily::Ideal, CostTerm::NonStartup),
    Metric::Score(ScoreFamily::Ideal, CostTerm::Combined),
    Metric::Score(ScoreFamily::Static, CostTerm::Cost),
    Metric::Score(ScoreFamily::Static, CostTerm::NonStartup),
    Metric::Score(ScoreFamily::Static, CostTerm::Combined),
];

impl ScoreFamily {
    fn name(self) -> &'static str {
        match self {
            ScoreFamily::Ideal => "Ideal",
            ScoreFamily::Static => "Static",
        }
    }
}

impl CostTerm {
    fn name(self) -> &'static str {
        match self {
            CostTerm::Cost => "Cost",
            CostTerm::NonStartup => "Non-Startup",
            CostTerm::Combined => "Combined",
        }
    }

    fn value(self, observed: &Observed) -> i64 {
        match self {
            CostTerm::Cost => observed.estimated_cost,
            CostTerm::NonStartup => non_startup_cost(observed),
            CostTerm::Combined => combined_estimate(observed),
        }
    }

    fn time_ratio(self) -> Derived {
        match self {
            CostTerm::Cost => Derived::TimePerCost,
            CostTerm::NonStartup => Derived::TimePerNonStartupCost,
            CostTerm::Combined => Derived::TimePerCombinedEstimate,
        }
    }
}

impl Metric {
    /// Scores are heuristics; [`Metric::Actual`] is the ground truth they are compared against.
    pub fn is_heuristic(self) -> bool {
        matches!(self, Metric::Score(..))
    }

    /// Row position of the value this metric ranks by.
    pub fn value_index(self) -> usize {
        match self {
            Metric::Actual => Derived::TotalTime.index(),
            Metric::Score(family, term) => Derived::Score(family, term).index(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Actual => f.write_str("Actual"),
            Metric::Score(family, term) => write!(f, "{} {}", family.name(), term.name()),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    /// Parses a metric by its display name, ignoring case, e.g. `static cost` or `Ideal Combined`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        METRICS
            .iter()
            .copied()
            .find(|metric| metric.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown metric `{s}`"))
    }
}

//=================
// Derived columns

/// Derived columns appended to every complete row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Derived {
    NonStartupCost,
    CombinedEstimate,
    TimePerCost,
    TimePerRows,
    TimePerNonStartupCost,
    TimePerCombinedEstimate,
    InstantiationTimePerRow,
    TotalTime,
    Score(ScoreFamily, CostTerm),
}

/// Derived columns in declared order.
pub const DERIVED_COLUMNS: [Derived; 14] = [
    Derived::NonStartupCost,
    Derived::CombinedEstimate,
    Derived::TimePerCost,
    Derived::TimePerRows,
    Derived::TimePerNonStartupCost,
    Derived::TimePerCombinedEstimate,
    Derived::InstantiationTimePerRow,
    Derived::TotalTime,
    Derived::Score(ScoreFamily::Ideal, CostTerm::Cost),
    Derived::Score(ScoreFamily::Ideal, CostTerm::NonStartup),
    Derived::Score(ScoreFamily::Ideal, CostTerm::Combined),
    Derived::Score(ScoreFamily::Static, CostTerm::Cost),
    Derived::Score(ScoreFamily::Static, CostTerm::NonStartup),
    Derived::Score(ScoreFamily::Static, CostTerm::Combined),
];

impl Derived {
    pub fn header(self) -> String {
        match self {
            Derived::NonStartupCost => "Non-Startup Cost".to_owned(),
            Derived::CombinedEstimate => "Combined Estimate".to_owned(),
            Derived::TimePerCost => "Time / Cost".to_owned(),
            Derived::TimePerRows => "Time / Rows".to_owned(),
            Derived::TimePerNonStartupCost => "Time / Non-Startup Cost".to_owned(),
            Derived::TimePerCombinedEstimate => "Time / Combined Estimate".to_owned(),
            Derived::InstantiationTimePerRow => "Instantiation Time / Row".to_owned(),
            Derived::TotalTime => "Total Time (ms)".to_owned(),
            Derived::Score(family, term) => format!("{} {} Score", family.name(), term.name()),
        }
    }

    /// Row position of the column in an analyzed row.
    pub fn index(self) -> usize {
        let offset = DERIVED_COLUMNS
            .iter()
            .position(|derived| *derived == self)
            .expect("every `Derived` value is listed in `DERIVED_COLUMNS` by construction");
        BASE_WIDTH + offset
    }

    fn compute(self, observed: &Observed, width: i64, config: &StatsConfig) -> Value {
        let places = config.decimal_places;
        match self {
            Derived::NonStartupCost => Value::Int(non_startup_cost(observed)),
            Derived::CombinedEstimate => Value::Int(combined_estimate(observed)),
            Derived::TimePerCost => ratio(observed.actual_time, observed.estimated_cost, places),
            Derived::TimePerRows => ratio(observed.actual_time, observed.estimated_rows, places),
            Derived::TimePerNonStartupCost => {
                ratio(observed.actual_time, non_startup_cost(observed), places)
            }
            Derived::TimePerCombinedEstimate => {
                ratio(observed.actual_time, combined_estimate(observed), places)
            }
            Derived::InstantiationTimePerRow => {
                ratio(observed.instantiation_time, observed.actual_rows, places)
            }
            Derived::TotalTime => Value::Int(observed.total_time()),
            Derived::Score(family, term) => score(family, term, observed, width, config),
        }
    }
}

pub fn non_startup_cost(observed: &Observed) -> i64 {
    observed.estimated_cost.saturating_sub(observed.startup_cost)
}

/// Integer square root of estimated cost times estimated rows.
pub fn combined_estimate(observed: &Observed) -> i64 {
    let product = u128::from(observed.estimated_cost.unsigned_abs())
        * u128::from(observed.estimated_rows.unsigned_abs());
    i64::try_from(product.isqrt()).unwrap_or(i64::MAX)
}

/// `numerator / denominator` rounded to `places`, or [`Value::Undefined`] for a zero denominator.
pub fn ratio(numerator: i64, denominator: i64, places: u32) -> Value {
    if denominator == 0 {
        return Value::Undefined;
    }
    Value::Decimal(round_to(numerator as f64 / denominator as f64, places))
}

/// `term * D + estimated rows * width * M`.
fn score(
    family: ScoreFamily,
    term: CostTerm,
    observed: &Observed,
    width: i64,
    config: &StatsConfig,
) -> Value {
    let places = config.decimal_places;
    let (d, m) = match family {
        ScoreFamily::Static => (config.static_d, config.static_m),
        ScoreFamily::Ideal => {
            let d = term.time_ratio().compute(observed, width, config);
            let m = Derived::InstantiationTimePerRow.compute(observed, width, config);
            match (d, m) {
                (Value::Decimal(d), Value::Decimal(m)) => (d, m),
                _ => return Value::Undefined,
            }
        }
    };
    let term_value = term.value(observed) as f64;
    let rows = observed.estimated_rows as f64 * width as f64;
    Value::Decimal(round_to(term_value * d + rows * m, places))
}

/// Derived values for a complete row, in [`DERIVED_COLUMNS`] order.
pub fn derived_values(observed: &Observed, width: i64, config: &StatsConfig) -> Vec<Value> {
    DERIVED_COLUMNS
        .iter()
        .map(|derived| derived.compute(observed, width, config))
        .collect()
}

/// Appends derived columns to `row` if it is complete; incomplete rows are left as they are.
pub fn derive_row(
    row: &mut RunRow,
    context: &ParseContext,
    config: &StatsConfig,
) -> Result<(), StatsError> {
    let observed = match row.observed() {
        Some(observed) => observed,
        None => return Ok(()),
    };
    let width = context.width(observed.rule_id)?;
    for value in derived_values(&observed, width, config) {
        row.push(value);
    }
    Ok(())
}
