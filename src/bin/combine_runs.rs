//! Combines several logs of the same rewrite-evaluation experiment by (rule, rewrite) and prints
//! `mean ± stdev` of each statistic across the logs.

use anyhow::Context;
use psl_query_stats::{
    cli::{program_name, CliSpec},
    combine_runs, extract_file, Analysis, MarkerTable, StatsConfig,
};
use std::io;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let spec = CliSpec {
        program: program_name("combine_runs"),
        synopsis: "<output file> ...",
        toggles: &[],
        max_paths: None,
    };
    let args = spec.parse_env_or_exit();

    let config = StatsConfig::default();
    let markers = MarkerTable::default();
    let analyses = args
        .paths
        .iter()
        .map(|path| {
            let extraction = extract_file(&markers, path)
                .with_context(|| format!("failed to extract runs from {path}"))?;
            Analysis::new(extraction, &config)
                .with_context(|| format!("failed to analyze runs from {path}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    combine_runs(&analyses, &config).write_tsv(&mut io::stdout().lock())?;
    Ok(())
}
