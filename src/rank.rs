//! Ranking engine: per-rule ranks, misranks and time deltas over derived rows.

use crate::{
    derive_row, Derived, Extraction, Metric, ParseContext, RunRow, StatsConfig, StatsError, Table,
    Value, BASE_COLUMNS, BASE_WIDTH, DERIVED_COLUMNS, METRICS,
};
use std::collections::BTreeMap;

//=================
// Rank columns

/// Columns appended by the ranking pass, after the derived columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankColumn {
    /// Zero-based position of the row among its rule's rows, ordered by the metric.
    Rank(Metric),
    /// On the rule's fastest ([`Metric::Actual`] rank-0) row, that row's rank under the metric:
    /// how many runs the heuristic would have tried first. Heuristic metrics only.
    Misrank(Metric),
    /// On the metric's rank-0 row, its total time minus that of the rule's fastest run.
    BestDelta(Metric),
    /// On the metric's rank-0 row, its total time minus that of the rule's rewrite-0 run.
    BaseDelta(Metric),
}

impl RankColumn {
    pub fn header(self) -> String {
        match self {
            RankColumn::Rank(metric) => format!("{metric} Rank"),
            RankColumn::Misrank(metric) => format!("{metric} Misrank"),
            RankColumn::BestDelta(metric) => format!("{metric} Best Time Delta"),
            RankColumn::BaseDelta(metric) => format!("{metric} Base Time Delta"),
        }
    }

    /// Row position of the column in an analyzed row.
    pub fn index(self) -> usize {
        let offset = rank_columns()
            .iter()
            .position(|column| *column == self)
            .expect("every valid `RankColumn` is listed by `rank_columns` by construction");
        BASE_WIDTH + DERIVED_COLUMNS.len() + offset
    }
}

fn heuristic_metrics() -> impl Iterator<Item = Metric> {
    METRICS.into_iter().filter(|metric| metric.is_heuristic())
}

/// Rank columns in declared order: ranks, misranks, best deltas, base deltas.
pub fn rank_columns() -> Vec<RankColumn> {
    let ranks = METRICS.into_iter().map(RankColumn::Rank);
    let misranks = heuristic_metrics().map(RankColumn::Misrank);
    let best_deltas = METRICS.into_iter().map(RankColumn::BestDelta);
    let base_deltas = METRICS.into_iter().map(RankColumn::BaseDelta);
    ranks
        .chain(misranks)
        .chain(best_deltas)
        .chain(base_deltas)
        .collect()
}

/// Headers of a fully analyzed row.
pub fn analyzed_headers() -> Vec<String> {
    let base = BASE_COLUMNS.iter().map(|column| column.header().to_owned());
    let derived = DERIVED_COLUMNS.iter().map(|derived| derived.header());
    let ranked = rank_columns().into_iter().map(RankColumn::header);
    base.chain(derived).chain(ranked).collect()
}

//=================
// Ranking pass

/// Indexes of complete rows grouped by rule ID, in insertion order within each rule.
fn group_by_rule(rows: &[RunRow]) -> BTreeMap<i64, Vec<usize>> {
    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        if !row.is_complete() {
            continue;
        }
        if let Some(rule_id) = row.rule_id() {
            groups.entry(rule_id).or_default().push(idx);
        }
    }
    groups
}

fn total_time(row: &RunRow) -> i64 {
    row.get(Derived::TotalTime.index())
        .and_then(Value::as_int)
        .expect("derived rows carry an integer total time by construction")
}

/// Ranks of the rows in `group` under `metric`, aligned with `group`. Rows with an undefined
/// metric value are not compared and get [`Value::Undefined`].
fn rank_group(rows: &[RunRow], group: &[usize], metric: Metric) -> Vec<Value> {
    let mut keyed: Vec<(usize, f64)> = group
        .iter()
        .enumerate()
        .filter_map(|(pos, idx)| {
            rows[*idx]
                .get(metric.value_index())
                .and_then(Value::as_f64)
                .map(|value| (pos, value))
        })
        .collect();

    // `sort_by` is stable: ties keep insertion order.
    keyed.sort_by(|(_, left), (_, right)| left.total_cmp(right));

    let mut ranks = vec![Value::Undefined; group.len()];
    for (rank, (pos, _)) in keyed.into_iter().enumerate() {
        ranks[pos] = Value::Int(rank as i64);
    }
    ranks
}

/// Appends rank, misrank and delta columns to the complete rows of `rows`.
///
/// Rows must already carry their derived columns.
pub fn rank_rows(rows: &mut [RunRow]) {
    let metric_pos = |metric: Metric| {
        METRICS
            .iter()
            .position(|m| *m == metric)
            .expect("`metric` is listed in `METRICS` by construction")
    };
    let actual_pos = metric_pos(Metric::Actual);

    for (rule_id, group) in group_by_rule(rows) {
        log::trace!("ranking {} rows of rule {}", group.len(), rule_id);

        // ranks[m][i] is the rank of row `group[i]` under `METRICS[m]`.
        let ranks: Vec<Vec<Value>> = METRICS
            .iter()
            .map(|metric| rank_group(rows, &group, *metric))
            .collect();

        let totals: Vec<i64> = group.iter().map(|idx| total_time(&rows[*idx])).collect();
        let optimum = ranks[actual_pos]
            .iter()
            .position(|rank| *rank == Value::Int(0))
            .map(|pos| totals[pos]);
        let baseline = group
            .iter()
            .position(|idx| rows[*idx].rewrite_id() == Some(0))
            .map(|pos| totals[pos]);

        for (pos, idx) in group.iter().enumerate() {
            let row = &mut rows[*idx];
            let is_rank_0 = |metric: Metric| ranks[metric_pos(metric)][pos] == Value::Int(0);

            for metric_ranks in &ranks {
                row.push(metric_ranks[pos].clone());
            }

            for metric in heuristic_metrics() {
                let misrank = if is_rank_0(Metric::Actual) {
                    ranks[metric_pos(metric)][pos].clone()
                } else {
                    Value::Int(0)
                };
                row.push(misrank);
            }

            for metric in METRICS {
                let delta = match (is_rank_0(metric), optimum) {
                    (true, Some(optimum)) => Value::Int(totals[pos] - optimum),
                    _ => Value::Int(0),
                };
                row.push(delta);
            }

            for metric in METRICS {
                let delta = match (is_rank_0(metric), baseline) {
                    (true, Some(baseline)) => Value::Int(totals[pos] - baseline),
                    (true, None) => Value::Undefined,
                    (false, _) => Value::Int(0),
                };
                row.push(delta);
            }
        }
    }
}

//=================
// Analysis

/// Rows of one log after the derived-metric and ranking passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    rows: Vec<RunRow>,
    context: ParseContext,
}

impl Analysis {
    /// Appends derived columns to every complete row, then ranks and deltas.
    pub fn new(extraction: Extraction, config: &StatsConfig) -> Result<Self, StatsError> {
        let Extraction { mut rows, context } = extraction;
        for row in rows.iter_mut() {
            derive_row(row, &context, config)?;
        }
        rank_rows(&mut rows);
        log::debug!(
            "analyzed {} rows across {} rules",
            rows.len(),
            context.rule_widths().len()
        );
        Ok(Self { rows, context })
    }

    /// All rows in log order, incomplete rows included.
    pub fn rows(&self) -> &[RunRow] {
        &self.rows
    }

    pub fn complete_rows(&self) -> impl Iterator<Item = &RunRow> {
        self.rows.iter().filter(|row| row.is_complete())
    }

    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    /// Complete rows with every analyzed column.
    pub fn ranked_table(&self) -> Table {
        self.table(self.complete_rows())
    }

    /// Every row in log order; incomplete rows are truncated.
    pub fn all_rows_table(&self) -> Table {
        self.table(self.rows.iter())
    }

    fn table<'a>(&self, rows: impl Iterator<Item = &'a RunRow>) -> Table {
        let mut table = Table::new(analyzed_headers());
        for row in rows {
            table.push_row(row.values().iter().map(ToString::to_string).collect());
        }
        table
    }
}

/// Value of `column` on an analyzed row.
pub fn rank_value(row: &RunRow, column: RankColumn) -> Option<&Value> {
    row.get(column.index())
}
