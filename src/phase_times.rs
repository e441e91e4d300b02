//! Phase breakdown of full PSL runs: time spent grounding and total time to inference.

use crate::{line_timestamp, StatsError, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

static GROUNDING_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"- Grounding \d+ rule\(s\) with query:")
        .expect("grounding start pattern is valid by construction")
});

static GROUNDING_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"- Generated \d+ ground rules with query:")
        .expect("grounding end pattern is valid by construction")
});

static GROUNDING_COMPLETE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"- Initializing objective terms for \d+ ground rules")
        .expect("grounding complete pattern is valid by construction")
});

static INFERENCE_COMPLETE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"- Inference Complete").expect("inference pattern is valid by construction")
});

pub const PHASE_HEADERS: [&str; 3] = ["ID", "Grounding Time (ms)", "Total Time (ms)"];

/// Phase times of one log, in ms. Phases the log never finished are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseTimes {
    /// Sum of the `Grounding ...` to `Generated ...` spans, once grounding is complete.
    pub grounding_time: Option<u64>,
    /// Timestamp of `Inference Complete`.
    pub total_time: Option<u64>,
}

impl PhaseTimes {
    pub fn from_lines<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> Self {
        let mut times = Self::default();
        let mut timestamp = None;
        let mut span_start = None;
        let mut grounding = 0_u64;

        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            if let Some(now) = line_timestamp(line) {
                timestamp = Some(now);
            }

            if GROUNDING_START.is_match(line) {
                span_start = timestamp;
            } else if GROUNDING_END.is_match(line) {
                match (span_start.take(), timestamp) {
                    (Some(start), Some(now)) => grounding += now.saturating_sub(start),
                    _ => log::trace!("ground rules generated outside of a grounding span"),
                }
            } else if GROUNDING_COMPLETE.is_match(line) {
                times.grounding_time = Some(grounding);
            } else if INFERENCE_COMPLETE.is_match(line) {
                times.total_time = timestamp;
            }
        }

        times
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StatsError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_lines(lines))
    }
}

/// Short IDs for `paths`: each path with the prefix and suffix common to all of them removed.
/// A single path is returned unchanged.
pub fn path_ids(paths: &[String]) -> Vec<String> {
    if paths.len() <= 1 {
        return paths.to_vec();
    }

    let chars: Vec<Vec<char>> = paths.iter().map(|path| path.chars().collect()).collect();
    let first = &chars[0];
    let shortest = chars.iter().map(Vec::len).min().unwrap_or(0);

    let prefix = (0..shortest)
        .take_while(|i| chars.iter().all(|path| path[*i] == first[*i]))
        .count();
    let suffix = (0..shortest - prefix)
        .take_while(|i| {
            chars
                .iter()
                .all(|path| path[path.len() - 1 - i] == first[first.len() - 1 - i])
        })
        .count();

    chars
        .iter()
        .map(|path| path[prefix..path.len() - suffix].iter().collect())
        .collect()
}

/// One row per `(id, times)` entry, in the given order. Unfinished phases are empty cells.
pub fn phase_table(entries: &[(String, PhaseTimes)]) -> Table {
    let mut table = Table::new(PHASE_HEADERS.map(str::to_owned).to_vec());
    let cell = |value: Option<u64>| value.map(|v| v.to_string()).unwrap_or_default();
    for (id, times) in entries {
        table.push_row(vec![
            id.clone(),
            cell(times.grounding_time),
            cell(times.total_time),
        ]);
    }
    table
}
