//! Prints the rule configurations worth a full run after a rewrite-evaluation log: no rewrites,
//! the fastest rewrite per rule, and the rewrite the chosen heuristic picks per rule.

use anyhow::Context;
use psl_query_stats::{
    cli::{program_name, CliSpec},
    extract_file, Analysis, MarkerTable, RunConfigs, StatsConfig,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let spec = CliSpec {
        program: program_name("run_configs"),
        synopsis: "<output file>",
        toggles: &[],
        max_paths: Some(1),
    };
    let args = spec.parse_env_or_exit();
    let path = &args.paths[0];

    let config = StatsConfig::default();
    let extraction = extract_file(&MarkerTable::default(), path)
        .with_context(|| format!("failed to extract runs from {path}"))?;
    let analysis = Analysis::new(extraction, &config)
        .with_context(|| format!("failed to analyze runs from {path}"))?;

    for (id, rule_config) in RunConfigs::new(&analysis, config.chosen_metric()).lines() {
        println!("{id}\t{rule_config}");
    }
    Ok(())
}
