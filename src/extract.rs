//! Log row extractor: a line scanner that assembles [`RunRow`]s from marker matches.

use crate::{
    line_timestamp, truncate_decimal, Column, Marker, MarkerTable, RunRow, StatsError, Value,
    BASE_WIDTH,
};
use regex::Captures;
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    mem,
    path::Path,
};

//=================
// ParseContext

/// State shared between extraction and analysis: the width (base-run atom count) of each rule.
///
/// Populated during extraction and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    rule_widths: BTreeMap<i64, i64>,
}

impl ParseContext {
    /// Width of `rule_id`, or [`StatsError::MissingRuleWidth`] if its base run was never seen.
    pub fn width(&self, rule_id: i64) -> Result<i64, StatsError> {
        self.rule_widths
            .get(&rule_id)
            .copied()
            .ok_or(StatsError::MissingRuleWidth { rule_id })
    }

    pub fn rule_widths(&self) -> &BTreeMap<i64, i64> {
        &self.rule_widths
    }

    /// Records the width of `rule_id`. The first recorded width wins.
    fn record_width(&mut self, rule_id: i64, width: i64) {
        let recorded = *self.rule_widths.entry(rule_id).or_insert(width);
        if recorded != width {
            log::warn!(
                "rule {rule_id} already has width {recorded}, ignoring conflicting width {width}"
            );
        }
    }
}

/// Output of one extraction pass: rows in log order plus the rule widths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub rows: Vec<RunRow>,
    pub context: ParseContext,
}

impl Extraction {
    pub fn complete_rows(&self) -> impl Iterator<Item = &RunRow> {
        self.rows.iter().filter(|row| row.is_complete())
    }
}

//=================
// Extractor

/// Single-pass state machine over log lines.
///
/// The accumulator holds the fields of the run in progress; it is empty between runs. Data
/// markers seen while it is empty come from unrelated PSL output and are ignored.
#[derive(Debug)]
pub struct Extractor<'t> {
    markers: &'t MarkerTable,
    current: Vec<Value>,
    timestamp: Option<u64>,
    phase_start: Option<u64>,
    line_number: usize,
    extraction: Extraction,
}

impl<'t> Extractor<'t> {
    pub fn new(markers: &'t MarkerTable) -> Self {
        Self {
            markers,
            current: Vec::with_capacity(BASE_WIDTH),
            timestamp: None,
            phase_start: None,
            line_number: 0,
            extraction: Extraction::default(),
        }
    }

    /// Consumes one raw log line.
    pub fn feed(&mut self, line: &str) -> Result<(), StatsError> {
        self.line_number += 1;
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        if let Some(timestamp) = line_timestamp(line) {
            self.timestamp = Some(timestamp);
        }

        let (marker, caps) = match self.markers.match_line(line) {
            Some(matched) => matched,
            None => return Ok(()),
        };
        log::trace!("line {}: matched {:?}", self.line_number, marker);

        match marker {
            Marker::RunStart => {
                self.flush_incomplete();
                self.phase_start = None;
            }
            Marker::RuleSelected => {
                let rule_id = self.int_capture(&caps, 1)?;
                self.current.push(Value::Int(rule_id));
            }
            _ if self.current.is_empty() => {
                log::trace!(
                    "line {}: ignoring {:?} outside of a run",
                    self.line_number,
                    marker
                );
            }
            Marker::QueryFormula => {
                let rewrite_id = self.int_capture(&caps, 1)?;
                self.current.push(Value::Int(rewrite_id));
                self.current.push(Value::Text(text_capture(&caps, 2).to_owned()));
            }
            Marker::AtomCount => {
                let atom_count = self.int_capture(&caps, 1)?;
                self.current.push(Value::Int(atom_count));
                self.record_base_width(atom_count);
            }
            Marker::BeginExplain => {
                self.phase_start = self.timestamp;
            }
            Marker::Estimate => {
                let explain_time = self.elapsed(marker)?;
                self.current.push(Value::Int(explain_time));
                for group in 1..=3 {
                    let value = self.decimal_capture(&caps, group)?;
                    self.current.push(Value::Int(value));
                }
                self.phase_start = self.timestamp;
            }
            Marker::FirstResponse | Marker::QueryComplete => {
                let elapsed = self.elapsed(marker)?;
                self.current.push(Value::Int(elapsed));
            }
            Marker::ResultsReturned => {
                let actual_rows = self.int_capture(&caps, 1)?;
                self.current.push(Value::Int(actual_rows));
                self.phase_start = self.timestamp;
            }
            Marker::GroundRules => {
                let instantiation_time = self.elapsed(marker)?;
                let ground_count = self.int_capture(&caps, 1)?;
                self.current.push(Value::Int(instantiation_time));
                self.current.push(Value::Int(ground_count));
                self.complete_row()?;
            }
        }

        Ok(())
    }

    /// Flushes a trailing partial run and returns everything extracted.
    pub fn finish(mut self) -> Extraction {
        self.flush_incomplete();
        self.extraction
    }

    fn complete_row(&mut self) -> Result<(), StatsError> {
        if self.current.len() != BASE_WIDTH {
            return Err(StatsError::SchemaMismatch {
                line_number: self.line_number,
                expected: BASE_WIDTH,
                found: self.current.len(),
            });
        }
        let values = mem::replace(&mut self.current, Vec::with_capacity(BASE_WIDTH));
        let row = RunRow::new(values, true);
        log::debug!(
            "line {}: completed run for rule {:?}, rewrite {:?}",
            self.line_number,
            row.rule_id(),
            row.rewrite_id()
        );
        self.extraction.rows.push(row);
        Ok(())
    }

    fn flush_incomplete(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let values = mem::replace(&mut self.current, Vec::with_capacity(BASE_WIDTH));
        log::debug!(
            "line {}: keeping incomplete run with {} of {} fields",
            self.line_number,
            values.len(),
            BASE_WIDTH
        );
        self.extraction.rows.push(RunRow::new(values, false));
    }

    fn record_base_width(&mut self, atom_count: i64) {
        let rule_id = self
            .current
            .get(Column::RuleId.index())
            .and_then(Value::as_int);
        let rewrite_id = self
            .current
            .get(Column::RewriteId.index())
            .and_then(Value::as_int);
        if let (Some(rule_id), Some(0)) = (rule_id, rewrite_id) {
            self.extraction.context.record_width(rule_id, atom_count);
        }
    }

    /// Milliseconds between the phase start and the current timestamp.
    fn elapsed(&self, marker: Marker) -> Result<i64, StatsError> {
        match (self.phase_start, self.timestamp) {
            (Some(start), Some(now)) => {
                Ok(i64::try_from(now.saturating_sub(start)).unwrap_or(i64::MAX))
            }
            _ => Err(StatsError::MissingPhaseStart {
                line_number: self.line_number,
                marker,
            }),
        }
    }

    fn int_capture(&self, caps: &Captures, group: usize) -> Result<i64, StatsError> {
        let text = text_capture(caps, group);
        text.parse().map_err(|_| self.bad_number(text))
    }

    fn decimal_capture(&self, caps: &Captures, group: usize) -> Result<i64, StatsError> {
        let text = text_capture(caps, group);
        truncate_decimal(text).ok_or_else(|| self.bad_number(text))
    }

    fn bad_number(&self, text: &str) -> StatsError {
        StatsError::BadNumber {
            line_number: self.line_number,
            text: text.to_owned(),
        }
    }
}

fn text_capture<'c>(caps: &Captures<'c>, group: usize) -> &'c str {
    caps.get(group).map(|m| m.as_str()).unwrap_or("")
}

//=================
// Entry points

/// Extracts rows from an in-memory sequence of lines.
pub fn extract_lines<'a>(
    markers: &MarkerTable,
    lines: impl IntoIterator<Item = &'a str>,
) -> Result<Extraction, StatsError> {
    let mut extractor = Extractor::new(markers);
    for line in lines {
        extractor.feed(line)?;
    }
    Ok(extractor.finish())
}

/// Extracts rows from the log text `text`.
pub fn extract_str(markers: &MarkerTable, text: &str) -> Result<Extraction, StatsError> {
    extract_lines(markers, text.lines())
}

/// Extracts rows from the log file at `path`.
pub fn extract_file(markers: &MarkerTable, path: impl AsRef<Path>) -> Result<Extraction, StatsError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut extractor = Extractor::new(markers);
    for line in reader.lines() {
        extractor.feed(&line?)?;
    }
    Ok(extractor.finish())
}
