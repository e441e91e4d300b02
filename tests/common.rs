use dev_support::log_builder::{LogBuilder, RunSpec};
use psl_query_stats::{extract_str, Analysis, MarkerTable, StatsConfig, Table};

pub fn analyze(log: &str) -> Analysis {
    let extraction = extract_str(&MarkerTable::default(), log).unwrap();
    Analysis::new(extraction, &StatsConfig::default()).unwrap()
}

/// Cell of `table` at `row` under `header`.
pub fn cell<'a>(table: &'a Table, row: usize, header: &str) -> &'a str {
    let col = table
        .column(header)
        .unwrap_or_else(|| panic!("no column `{header}`"));
    &table.rows()[row][col]
}

/// Rule 1 with three rewrites.
///
/// | rewrite | total time | static cost score |
/// |---------|------------|-------------------|
/// | 0       | 40         | 1.9               |
/// | 1       | 20         | 3.7               |
/// | 2       | 60         | 0.28              |
///
/// The fastest run is rewrite 1, while the static cost score picks rewrite 2.
pub fn three_rewrite_specs() -> Vec<RunSpec> {
    vec![
        RunSpec::new(1, 0),
        RunSpec::new(1, 1)
            .with_estimates(200.0, 20.0, 50.0)
            .with_times(15, 5),
        RunSpec::new(1, 2)
            .with_estimates(10.0, 0.0, 50.0)
            .with_times(50, 10),
    ]
}

pub fn three_rewrite_log() -> String {
    let mut builder = LogBuilder::default();
    for spec in three_rewrite_specs() {
        builder.run(&spec);
    }
    builder.build()
}
