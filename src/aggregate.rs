//! Reductions over several independently analyzed logs of the same experiment.

use crate::{
    summary_stats, Analysis, Column, Derived, Metric, RankColumn, RunRow, Spread, StatsConfig,
    Table, Value, DERIVED_COLUMNS, METRICS, OBSERVED_STATS, SUMMARY_STATS_HEADERS,
};
use std::collections::BTreeMap;

//=================
// Combine

/// How a combined column reduces the values of a (rule, rewrite) group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reduction {
    /// `mean ± stdev`.
    Spread,
    Sum,
}

/// Identity columns copied from a group's representative row.
const IDENTITY: [Column; 4] = [
    Column::RuleId,
    Column::RewriteId,
    Column::Formula,
    Column::AtomCount,
];

/// Columns reduced across logs, as (row position, header, reduction), in analyzed-row order.
fn combined_columns() -> Vec<(usize, String, Reduction)> {
    let observed = OBSERVED_STATS
        .iter()
        .map(|column| (column.index(), column.header().to_owned(), Reduction::Spread));
    let derived = DERIVED_COLUMNS
        .iter()
        .filter(|derived| matches!(derived, Derived::TotalTime | Derived::Score(..)))
        .map(|derived| (derived.index(), derived.header(), Reduction::Spread));
    let misranks = METRICS
        .into_iter()
        .filter(|metric| metric.is_heuristic())
        .map(RankColumn::Misrank)
        .map(|column| (column.index(), column.header(), Reduction::Sum));
    let deltas = METRICS
        .into_iter()
        .map(RankColumn::BestDelta)
        .chain(METRICS.into_iter().map(RankColumn::BaseDelta))
        .map(|column| (column.index(), column.header(), Reduction::Spread));

    observed.chain(derived).chain(misranks).chain(deltas).collect()
}

fn reduce(rows: &[&RunRow], index: usize, reduction: Reduction, places: u32) -> String {
    let values: Vec<f64> = rows
        .iter()
        .filter(|row| row.is_complete())
        .filter_map(|row| row.get(index).and_then(Value::as_f64))
        .collect();
    if values.is_empty() {
        return String::new();
    }
    match reduction {
        Reduction::Spread => Spread::new(&values)
            .map(|spread| spread.display(places).to_string())
            .unwrap_or_default(),
        Reduction::Sum => values.iter().sum::<f64>().to_string(),
    }
}

/// Combines the rows of several logs by (rule ID, rewrite ID), sorted by that key.
///
/// Identity columns come from the group's first complete row (or its first row if none is
/// complete). Observed stats, total time, scores and deltas become `mean ± stdev` over the
/// group's complete rows; misranks are summed. Cells with no complete values are empty.
pub fn combine_runs(analyses: &[Analysis], config: &StatsConfig) -> Table {
    let columns = combined_columns();

    let headers = IDENTITY
        .iter()
        .map(|column| column.header().to_owned())
        .chain(columns.iter().map(|(_, header, _)| header.clone()))
        .collect();
    let mut table = Table::new(headers);

    let mut groups: BTreeMap<(i64, i64), Vec<&RunRow>> = BTreeMap::new();
    for row in analyses.iter().flat_map(|analysis| analysis.rows()) {
        if let (Some(rule_id), Some(rewrite_id)) = (row.rule_id(), row.rewrite_id()) {
            groups.entry((rule_id, rewrite_id)).or_default().push(row);
        }
    }
    log::debug!(
        "combining {} logs into {} rewrite groups",
        analyses.len(),
        groups.len()
    );

    for rows in groups.values() {
        let representative = rows
            .iter()
            .find(|row| row.is_complete())
            .or_else(|| rows.first())
            .expect("groups are created with at least one row");

        let identity = IDENTITY.iter().map(|column| {
            representative
                .base(*column)
                .map(ToString::to_string)
                .unwrap_or_default()
        });
        let reduced = columns
            .iter()
            .map(|(index, _, reduction)| reduce(rows, *index, *reduction, config.decimal_places));

        table.push_row(identity.chain(reduced).collect());
    }

    table
}

//=================
// Summarize

/// Per-log totals compared by [`summarize_runs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExperimentTotals {
    /// Sum of the chosen metric's misranks, read from every rule's fastest run.
    pub misrank: i64,
    /// Total time of every rule's rewrite-0 run.
    pub base_time: i64,
    /// Total time of every rule's fastest run.
    pub best_time: i64,
    /// Total time of every rule's run chosen by the chosen metric.
    pub chosen_time: i64,
}

pub const SUMMARY_COLUMNS: [&str; 4] = ["Misrank", "Base Time", "Best Time", "Chosen Time"];

const SUMMARY_PLACES: u32 = 1;

impl ExperimentTotals {
    pub fn new(analysis: &Analysis, chosen: Metric) -> Self {
        let int_at = |row: &RunRow, index: usize| row.get(index).and_then(Value::as_int);
        let is_rank_0 = |row: &RunRow, metric: Metric| {
            int_at(row, RankColumn::Rank(metric).index()) == Some(0)
        };

        let mut totals = Self::default();
        for row in analysis.complete_rows() {
            let total = int_at(row, Derived::TotalTime.index()).unwrap_or(0);
            if row.rewrite_id() == Some(0) {
                totals.base_time += total;
            }
            // A row can count towards several totals.
            if is_rank_0(row, Metric::Actual) {
                totals.best_time += total;
                if chosen.is_heuristic() {
                    totals.misrank += int_at(row, RankColumn::Misrank(chosen).index()).unwrap_or(0);
                }
            }
            if is_rank_0(row, chosen) {
                totals.chosen_time += total;
            }
        }
        totals
    }

    fn columns(&self) -> [i64; 4] {
        [
            self.misrank,
            self.base_time,
            self.best_time,
            self.chosen_time,
        ]
    }
}

/// One row of `mean ± stdev` over the per-log [`ExperimentTotals`].
pub fn summarize_runs(analyses: &[Analysis], config: &StatsConfig) -> Table {
    let all_totals = experiment_totals(analyses, config);
    let mut table = Table::new(SUMMARY_COLUMNS.iter().map(|h| (*h).to_owned()).collect());

    let row = (0..SUMMARY_COLUMNS.len())
        .map(|col| {
            let values: Vec<f64> = all_totals.iter().map(|t| t.columns()[col] as f64).collect();
            Spread::new(&values)
                .map(|spread| spread.display(SUMMARY_PLACES).to_string())
                .unwrap_or_default()
        })
        .collect();
    table.push_row(row);
    table
}

/// One row per [`SUMMARY_COLUMNS`] entry with histogram summary statistics over the logs.
pub fn summarize_distribution(analyses: &[Analysis], config: &StatsConfig) -> Table {
    let all_totals = experiment_totals(analyses, config);
    let headers = std::iter::once("Column")
        .chain(SUMMARY_STATS_HEADERS)
        .map(str::to_owned)
        .collect();
    let mut table = Table::new(headers);

    for (col, name) in SUMMARY_COLUMNS.iter().enumerate() {
        let values = all_totals
            .iter()
            .map(|t| u64::try_from(t.columns()[col]).unwrap_or(0));
        let stats = summary_stats(values, config.hist_high, config.hist_sigfig);

        let mut row = vec![(*name).to_owned()];
        row.extend(stats.cells(SUMMARY_PLACES));
        table.push_row(row);
    }
    table
}

fn experiment_totals(analyses: &[Analysis], config: &StatsConfig) -> Vec<ExperimentTotals> {
    analyses
        .iter()
        .map(|analysis| ExperimentTotals::new(analysis, config.chosen_metric))
        .collect()
}
