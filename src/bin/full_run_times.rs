//! Summarizes the wall-clock time of full PSL runs per dataset and configuration.
//!
//! Each log must live at `<dataset>/<full_run_base|full_run_fastest|full_run_s_score>/<file>`;
//! its time is the last timestamp it contains.

use anyhow::{anyhow, Context};
use psl_query_stats::{
    cli::{program_name, CliSpec},
    final_timestamp_of_file, full_run_times, FullRun,
};
use std::{io, path::Path};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let spec = CliSpec {
        program: program_name("full_run_times"),
        synopsis: "<output file> ...",
        toggles: &[],
        max_paths: None,
    };
    let args = spec.parse_env_or_exit();

    let mut runs = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        let time = final_timestamp_of_file(path)
            .with_context(|| format!("failed to read {path}"))?
            .ok_or_else(|| anyhow!("no timestamped lines in {path}"))?;
        let run = FullRun::from_path(Path::new(path), time).ok_or_else(|| {
            anyhow!("{path} is not inside a full_run_base, full_run_fastest or full_run_s_score directory")
        })?;
        runs.push(run);
    }

    full_run_times(&runs).write_tsv(&mut io::stdout().lock())?;
    Ok(())
}
