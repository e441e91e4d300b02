//! Summarizes several logs of the same rewrite-evaluation experiment: misrank, base, best and
//! chosen total times as `mean ± stdev`, or as full distributions with `--distribution`.

use anyhow::Context;
use psl_query_stats::{
    cli::{program_name, CliSpec},
    extract_file, summarize_distribution, summarize_runs, Analysis, MarkerTable, StatsConfig,
};
use std::io;

const DISTRIBUTION: &str = "--distribution";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let spec = CliSpec {
        program: program_name("summarize_runs"),
        synopsis: "[--distribution] <output file> ...",
        toggles: &[DISTRIBUTION],
        max_paths: None,
    };
    let args = spec.parse_env_or_exit();

    let config = StatsConfig::default();
    let markers = MarkerTable::default();
    let mut analyses = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        let extraction = extract_file(&markers, path)
            .with_context(|| format!("failed to extract runs from {path}"))?;
        let analysis = Analysis::new(extraction, &config)
            .with_context(|| format!("failed to analyze runs from {path}"))?;
        analyses.push(analysis);
    }

    let table = if args.has(DISTRIBUTION) {
        summarize_distribution(&analyses, &config)
    } else {
        summarize_runs(&analyses, &config)
    };
    table.write_tsv(&mut io::stdout().lock())?;
    Ok(())
}
