//! Parses one PSL rewrite-evaluation log and prints its runs as a tab-separated table on `stdout`.
//!
//! By default only complete runs are printed, with every derived, rank and delta column.
//! With `--all`, every run is printed in log order and incomplete runs are truncated.

use anyhow::Context;
use psl_query_stats::{
    cli::{program_name, CliSpec},
    extract_file, Analysis, MarkerTable, StatsConfig,
};
use std::io::{self, Write};

const ALL: &str = "--all";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let spec = CliSpec {
        program: program_name("parse_query_results"),
        synopsis: "[--all] <output file>",
        toggles: &[ALL],
        max_paths: Some(1),
    };
    let args = spec.parse_env_or_exit();
    let path = &args.paths[0];

    let extraction = extract_file(&MarkerTable::default(), path)
        .with_context(|| format!("failed to extract runs from {path}"))?;
    let analysis = Analysis::new(extraction, &StatsConfig::default())
        .with_context(|| format!("failed to analyze runs from {path}"))?;

    let table = if args.has(ALL) {
        analysis.all_rows_table()
    } else {
        analysis.ranked_table()
    };

    let mut out = io::stdout().lock();
    table.write_tsv(&mut out)?;
    out.flush()?;
    Ok(())
}
