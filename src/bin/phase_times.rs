//! Prints the grounding time and total time of each full PSL run log, one row per log, with IDs
//! made from the paths minus their common prefix and suffix.

use anyhow::Context;
use psl_query_stats::{
    cli::{program_name, CliSpec},
    path_ids, phase_table, PhaseTimes,
};
use std::{io, path};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let spec = CliSpec {
        program: program_name("phase_times"),
        synopsis: "<output file> ...",
        toggles: &[],
        max_paths: None,
    };
    let args = spec.parse_env_or_exit();

    let absolute = args
        .paths
        .iter()
        .map(|p| {
            path::absolute(p)
                .map(|abs| abs.to_string_lossy().into_owned())
                .with_context(|| format!("failed to resolve {p}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut entries = Vec::with_capacity(absolute.len());
    for (id, path) in path_ids(&absolute).into_iter().zip(&args.paths) {
        let times =
            PhaseTimes::from_file(path).with_context(|| format!("failed to read {path}"))?;
        entries.push((id, times));
    }

    phase_table(&entries).write_tsv(&mut io::stdout().lock())?;
    Ok(())
}
