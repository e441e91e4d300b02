//! Wall-clock times of full (non-isolated) PSL runs executed with the configurations from
//! [`crate::RunConfigs`], grouped by dataset and run type.
//!
//! Logs are expected at `<dataset>/<run type dir>/<log file>`, where the run type directory is
//! one of [`RunType::dir_name`].

use crate::{line_timestamp, Spread, StatsError, Table};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Which configuration a full run executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RunType {
    Base,
    Optimal,
    Chosen,
}

pub const RUN_TYPES: [RunType; 3] = [RunType::Base, RunType::Optimal, RunType::Chosen];

const FULL_RUN_PLACES: u32 = 0;

impl RunType {
    pub fn dir_name(self) -> &'static str {
        match self {
            RunType::Base => "full_run_base",
            RunType::Optimal => "full_run_fastest",
            RunType::Chosen => "full_run_s_score",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            RunType::Base => "Base Time",
            RunType::Optimal => "Optimal Time",
            RunType::Chosen => "Chosen Time",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        RUN_TYPES.into_iter().find(|run_type| run_type.dir_name() == name)
    }
}

/// One full-run log: its dataset, run type and final timestamp (ms).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullRun {
    pub dataset: String,
    pub run_type: RunType,
    pub time: u64,
}

impl FullRun {
    /// Reads the dataset and run type off the parent directories of `path`; `None` if the
    /// parent directory is not a known run type.
    pub fn from_path(path: &Path, time: u64) -> Option<Self> {
        let run_dir = path.parent()?;
        let run_type = RunType::from_dir_name(run_dir.file_name()?.to_str()?)?;
        let dataset = run_dir
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Some(Self {
            dataset,
            run_type,
            time,
        })
    }
}

/// Last leading-integer timestamp among `lines`.
pub fn final_timestamp<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> Option<u64> {
    lines
        .into_iter()
        .filter_map(|line| line_timestamp(line.as_ref().trim()))
        .last()
}

pub fn final_timestamp_of_file(path: impl AsRef<Path>) -> Result<Option<u64>, StatsError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut last = None;
    for line in reader.lines() {
        if let Some(timestamp) = line_timestamp(line?.trim()) {
            last = Some(timestamp);
        }
    }
    Ok(last)
}

/// One row per dataset (sorted by name) with `mean ± stdev` of each run type's times, rounded to
/// whole milliseconds. Run types without logs get an empty cell.
pub fn full_run_times(runs: &[FullRun]) -> Table {
    let headers = std::iter::once("Dataset")
        .chain(RUN_TYPES.map(RunType::header))
        .map(str::to_owned)
        .collect();
    let mut table = Table::new(headers);

    let mut datasets: BTreeMap<&str, BTreeMap<RunType, Vec<f64>>> = BTreeMap::new();
    for run in runs {
        datasets
            .entry(run.dataset.as_str())
            .or_default()
            .entry(run.run_type)
            .or_default()
            .push(run.time as f64);
    }
    log::debug!(
        "grouped {} full runs into {} datasets",
        runs.len(),
        datasets.len()
    );

    for (dataset, times) in datasets {
        let mut row = vec![dataset.to_owned()];
        row.extend(RUN_TYPES.iter().map(|run_type| {
            times
                .get(run_type)
                .and_then(|values| Spread::new(values))
                .map(|spread| spread.display(FULL_RUN_PLACES).to_string())
                .unwrap_or_default()
        }));
        table.push_row(row);
    }
    table
}
