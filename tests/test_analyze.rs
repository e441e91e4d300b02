use dev_support::{
    log_builder::{synthetic_log, LogBuilder, RunSpec},
    test_support::f64_within,
};
use psl_query_stats::{
    analyzed_headers, extract_str, rank_value, Analysis, CostTerm, MarkerTable, Metric,
    RankColumn, ScoreFamily, StatsConfig, StatsError, Value, BASE_WIDTH, DERIVED_COLUMNS,
    METRICS,
};

mod common;
use common::{analyze, cell, three_rewrite_log};

const STATIC_COST: Metric = Metric::Score(ScoreFamily::Static, CostTerm::Cost);
const IDEAL_COST: Metric = Metric::Score(ScoreFamily::Ideal, CostTerm::Cost);

#[test]
fn test_derived_columns_of_single_run() {
    let log = LogBuilder::default().run(&RunSpec::new(1, 0)).build();
    let table = analyze(&log).ranked_table();
    assert_eq!(table.rows().len(), 1, "row count");

    let expected = [
        ("Non-Startup Cost", "80"),
        ("Combined Estimate", "70"),
        ("Time / Cost", "0.3"),
        ("Time / Rows", "0.6"),
        ("Time / Non-Startup Cost", "0.375"),
        ("Time / Combined Estimate", "0.4286"),
        ("Instantiation Time / Row", "2"),
        ("Total Time (ms)", "40"),
        ("Ideal Cost Score", "230"),
        ("Ideal Non-Startup Score", "230"),
        ("Static Cost Score", "1.9"),
        ("Static Non-Startup Score", "1.54"),
        ("Static Combined Score", "1.36"),
    ];
    for (header, value) in expected {
        assert_eq!(cell(&table, 0, header), value, "{header}");
    }

    let ideal_combined: f64 = cell(&table, 0, "Ideal Combined Score").parse().unwrap();
    assert!(f64_within(ideal_combined, 230.002, 1e-9), "{ideal_combined}");

    // A lone run is every metric's pick and the fastest run at once.
    for column in psl_query_stats::rank_columns() {
        assert_eq!(cell(&table, 0, &column.header()), "0", "{}", column.header());
    }
}

#[test]
fn test_analyzed_row_layout() {
    let headers = analyzed_headers();
    assert_eq!(headers.len(), BASE_WIDTH + DERIVED_COLUMNS.len() + 7 + 6 + 7 + 7);
    assert_eq!(headers[0], "Rule ID");
    assert_eq!(headers[BASE_WIDTH], "Non-Startup Cost");
    assert_eq!(headers[BASE_WIDTH + DERIVED_COLUMNS.len()], "Actual Rank");
    assert_eq!(headers.last().unwrap(), "Static Combined Base Time Delta");

    for column in psl_query_stats::rank_columns() {
        assert_eq!(headers[column.index()], column.header());
    }
    assert!(!headers.contains(&"Actual Misrank".to_owned()));
}

#[test]
fn test_ranks_misranks_and_deltas() {
    let table = analyze(&three_rewrite_log()).ranked_table();
    assert_eq!(table.rows().len(), 3, "row count");

    let column = |header: &str| -> Vec<&str> {
        (0..table.rows().len())
            .map(|row| cell(&table, row, header))
            .collect()
    };

    assert_eq!(column("Total Time (ms)"), ["40", "20", "60"]);
    assert_eq!(column("Static Cost Score"), ["1.9", "3.7", "0.28"]);

    assert_eq!(column("Actual Rank"), ["1", "0", "2"]);
    assert_eq!(column("Static Cost Rank"), ["1", "2", "0"]);
    assert_eq!(column("Ideal Cost Rank"), ["1", "0", "2"]);

    // Misranks sit on the fastest run: the static cost score ranks rewrite 1 last.
    assert_eq!(column("Static Cost Misrank"), ["0", "2", "0"]);
    assert_eq!(column("Ideal Cost Misrank"), ["0", "0", "0"]);

    assert_eq!(column("Actual Best Time Delta"), ["0", "0", "0"]);
    assert_eq!(column("Actual Base Time Delta"), ["0", "-20", "0"]);
    assert_eq!(column("Static Cost Best Time Delta"), ["0", "0", "40"]);
    assert_eq!(column("Static Cost Base Time Delta"), ["0", "0", "20"]);
}

#[test]
fn test_misrank_is_read_from_fastest_run() {
    // Fastest first: rewrite 0, 1, 2, 3. Static cost score order: rewrite 2, 0, 3, 1.
    let log = LogBuilder::default()
        .run(&RunSpec::new(1, 0).with_estimates(100.0, 0.0, 50.0).with_times(10, 0))
        .run(&RunSpec::new(1, 1).with_estimates(200.0, 0.0, 50.0).with_times(20, 0))
        .run(&RunSpec::new(1, 2).with_estimates(10.0, 0.0, 50.0).with_times(30, 0))
        .run(&RunSpec::new(1, 3).with_estimates(150.0, 0.0, 50.0).with_times(40, 0))
        .build();
    let analysis = analyze(&log);
    let table = analysis.ranked_table();

    let column = |header: &str| -> Vec<&str> {
        (0..table.rows().len())
            .map(|row| cell(&table, row, header))
            .collect()
    };
    assert_eq!(column("Actual Rank"), ["0", "1", "2", "3"]);
    assert_eq!(column("Static Cost Rank"), ["1", "3", "0", "2"]);
    assert_eq!(column("Static Cost Misrank"), ["1", "0", "0", "0"]);

    let totals = psl_query_stats::ExperimentTotals::new(&analysis, STATIC_COST);
    assert_eq!(totals.misrank, 1, "misrank of the fastest run");
    assert_eq!(totals.best_time, 10);
    assert_eq!(totals.chosen_time, 30);
    assert_eq!(totals.base_time, 10);
}

#[test]
fn test_oversized_estimates_saturate() {
    let log = LogBuilder::default()
        .run(&RunSpec::new(1, 0))
        .build()
        .replace(
            "Estimated Cost: 100.00",
            "Estimated Cost: 12345678901234567890123.45",
        );
    let analysis = analyze(&log);
    let row = analysis.complete_rows().next().unwrap();
    let observed = row.observed().unwrap();

    assert_eq!(observed.estimated_cost, i64::MAX);
    assert_eq!(observed.startup_cost, 20);
    assert_eq!(
        cell(&analysis.ranked_table(), 0, "Non-Startup Cost"),
        (i64::MAX - 20).to_string()
    );
}

#[test]
fn test_ties_keep_log_order() {
    let log = LogBuilder::default()
        .run(&RunSpec::new(1, 0))
        .run(&RunSpec::new(1, 1))
        .run(&RunSpec::new(1, 2))
        .build();
    let table = analyze(&log).ranked_table();

    for metric in METRICS {
        let header = RankColumn::Rank(metric).header();
        let ranks: Vec<&str> = (0..3).map(|row| cell(&table, row, &header)).collect();
        assert_eq!(ranks, ["0", "1", "2"], "{header}");
    }
}

#[test]
fn test_rules_are_ranked_independently() {
    let log = LogBuilder::default()
        .run(&RunSpec::new(2, 0).with_times(100, 0))
        .run(&RunSpec::new(1, 0).with_times(50, 0))
        .run(&RunSpec::new(2, 1).with_times(10, 0))
        .run(&RunSpec::new(1, 1).with_times(70, 0))
        .build();
    let table = analyze(&log).ranked_table();

    let ranks: Vec<&str> = (0..4).map(|row| cell(&table, row, "Actual Rank")).collect();
    assert_eq!(ranks, ["1", "0", "0", "1"]);
}

#[test]
fn test_zero_denominators_are_undefined() {
    let log = LogBuilder::default()
        .run(
            &RunSpec::new(1, 0)
                .with_estimates(0.0, 0.0, 50.0)
                .with_actual_rows(0),
        )
        .run(&RunSpec::new(1, 1))
        .build();
    let table = analyze(&log).ranked_table();

    for header in [
        "Time / Cost",
        "Time / Non-Startup Cost",
        "Time / Combined Estimate",
        "Instantiation Time / Row",
        "Ideal Cost Score",
        "Ideal Non-Startup Score",
        "Ideal Combined Score",
        "Ideal Cost Rank",
    ] {
        assert_eq!(cell(&table, 0, header), "NA", "{header}");
    }
    assert_eq!(cell(&table, 0, "Time / Rows"), "0.6");
    assert_eq!(cell(&table, 0, "Static Cost Score"), "0.1");

    // The undefined row is left out of the ranking, so rewrite 1 is the ideal pick even though
    // rewrite 0 wins the tie on total time. The fastest run has no ideal rank to misrank by.
    assert_eq!(cell(&table, 1, "Ideal Cost Rank"), "0");
    assert_eq!(cell(&table, 0, "Actual Rank"), "0");
    assert_eq!(cell(&table, 0, "Ideal Cost Misrank"), "NA");
    assert_eq!(cell(&table, 1, "Ideal Cost Misrank"), "0");
    assert_eq!(cell(&table, 1, "Ideal Cost Best Time Delta"), "0");
}

#[test]
fn test_base_delta_without_complete_base_run() {
    let log = LogBuilder::default()
        .truncated_run(&RunSpec::new(1, 0), 5)
        .run(&RunSpec::new(1, 1))
        .build();
    let analysis = analyze(&log);
    let table = analysis.ranked_table();
    assert_eq!(table.rows().len(), 1, "only the complete run is ranked");

    for metric in METRICS {
        let base = RankColumn::BaseDelta(metric).header();
        let best = RankColumn::BestDelta(metric).header();
        assert_eq!(cell(&table, 0, &base), "NA", "{base}");
        assert_eq!(cell(&table, 0, &best), "0", "{best}");
    }

    let row = analysis.complete_rows().next().unwrap();
    assert_eq!(
        rank_value(row, RankColumn::BaseDelta(STATIC_COST)),
        Some(&Value::Undefined)
    );
}

#[test]
fn test_missing_rule_width() {
    let log = LogBuilder::default().run(&RunSpec::new(5, 1)).build();
    let extraction = extract_str(&MarkerTable::default(), &log).unwrap();
    let result = Analysis::new(extraction, &StatsConfig::default());

    assert!(
        matches!(result, Err(StatsError::MissingRuleWidth { rule_id: 5 })),
        "got {result:?}"
    );
}

#[test]
fn test_all_rows_table() {
    let log = LogBuilder::default()
        .run(&RunSpec::new(1, 0))
        .truncated_run(&RunSpec::new(1, 1), 5)
        .run(&RunSpec::new(1, 2))
        .build();
    let analysis = analyze(&log);

    let all = analysis.all_rows_table();
    let lengths: Vec<usize> = all.rows().iter().map(Vec::len).collect();
    assert_eq!(lengths, [analyzed_headers().len(), 4, analyzed_headers().len()]);
    assert_eq!(all.rows()[1], ["1", "1", "( A(x) & B(x, y) )", "2"]);

    let ranked = analysis.ranked_table();
    assert_eq!(ranked.rows().len(), 2);
    assert_eq!(cell(&ranked, 1, "Rewrite ID"), "2");

    let tsv = ranked.to_tsv();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 3, "header plus two rows");
    assert_eq!(lines[0], analyzed_headers().join("\t"));
}

#[test]
fn test_custom_static_coefficients() {
    let log = LogBuilder::default().run(&RunSpec::new(1, 0)).build();
    let extraction = extract_str(&MarkerTable::default(), &log).unwrap();
    let config = StatsConfig::default()
        .with_static_coefficients(1.0, 0.0)
        .with_decimal_places(2);
    let table = Analysis::new(extraction, &config).unwrap().ranked_table();

    assert_eq!(cell(&table, 0, "Static Cost Score"), "100");
    assert_eq!(cell(&table, 0, "Static Non-Startup Score"), "80");
    assert_eq!(cell(&table, 0, "Time / Combined Estimate"), "0.43");
}

#[test]
fn test_metric_names() {
    let names: Vec<String> = METRICS.iter().map(ToString::to_string).collect();
    assert_eq!(
        names,
        [
            "Actual",
            "Ideal Cost",
            "Ideal Non-Startup",
            "Ideal Combined",
            "Static Cost",
            "Static Non-Startup",
            "Static Combined",
        ]
    );
    assert_eq!("static cost".parse::<Metric>(), Ok(STATIC_COST));
    assert_eq!(" Ideal Cost ".parse::<Metric>(), Ok(IDEAL_COST));
    assert!("fastest".parse::<Metric>().is_err());
    assert_eq!(StatsConfig::default().chosen_metric(), STATIC_COST);
}

#[test]
fn test_synthetic_log_invariants() {
    let log = synthetic_log(6, 5, 7);
    let analysis = analyze(&log);
    let table = analysis.ranked_table();
    let width = analyzed_headers().len();

    assert!(table.rows().iter().all(|row| row.len() == width));

    let rank_0_per_rule = |metric: Metric| -> Vec<String> {
        let header = RankColumn::Rank(metric).header();
        (0..table.rows().len())
            .filter(|row| cell(&table, *row, &header) == "0")
            .map(|row| cell(&table, row, "Rule ID").to_owned())
            .collect()
    };
    let picked = rank_0_per_rule(Metric::Actual);
    let mut rules = picked.clone();
    rules.dedup();
    assert_eq!(picked, rules, "one fastest run per rule");
    assert_eq!(picked.len(), 6, "every rule has a fastest run");

    for row in 0..table.rows().len() {
        assert_eq!(cell(&table, row, "Actual Best Time Delta"), "0");
        for metric in METRICS {
            let delta = cell(&table, row, &RankColumn::BestDelta(metric).header());
            let delta: i64 = delta.parse().unwrap();
            assert!(delta >= 0, "best delta of {metric} must not be negative");
        }
    }
}

#[test]
fn test_analysis_is_deterministic() {
    let log = synthetic_log(8, 6, 42);
    let first = analyze(&log).all_rows_table().to_tsv();
    let second = analyze(&log).all_rows_table().to_tsv();
    assert_eq!(first, second);
}
