//! Errors raised while extracting and analyzing PSL logs.

use crate::Marker;
use std::io;
use thiserror::Error;

/// Errors produced by this library.
///
/// Incomplete runs and unrecognized lines are not errors; they are tolerated by the extractor.
/// Every variant here means the log and the parser disagree about the format, or an input could
/// not be read at all.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("unable to read log: {0}")]
    Io(#[from] io::Error),

    /// The completion marker fired with the wrong number of accumulated fields.
    #[error("line {line_number}: row has {found} fields at completion, expected {expected}")]
    SchemaMismatch {
        line_number: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line_number}: {marker:?} needs a phase start, but none was recorded")]
    MissingPhaseStart { line_number: usize, marker: Marker },

    /// A complete row belongs to a rule whose rewrite-0 atom count never appeared.
    #[error("no width recorded for rule {rule_id} (its base run never reported an atom count)")]
    MissingRuleWidth { rule_id: i64 },

    #[error("line {line_number}: `{text}` is not a valid number")]
    BadNumber { line_number: usize, text: String },

    #[error("bad search-space index ({found}), expected ({expected})")]
    BadIndex { found: i64, expected: usize },

    #[error("line {line_number}: full estimate has {fields} fields, expected 5")]
    BadEstimateLine { line_number: usize, fields: usize },

    #[error("invalid marker pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
