//! Log markers and the regex table that recognizes them.

use crate::StatsError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Log phrases that drive the extractor, one transition each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// A new evaluation run begins; any partial row belongs to a run that timed out.
    RunStart,
    /// Captures the rule ID.
    RuleSelected,
    /// Captures the rewrite (query) ID and the formula text.
    QueryFormula,
    /// Captures the atom count.
    AtomCount,
    BeginExplain,
    /// Captures estimated cost, startup cost and estimated rows as decimal text.
    Estimate,
    FirstResponse,
    QueryComplete,
    /// Captures the actual row count.
    ResultsReturned,
    /// Captures the final ground rule count. Completes the row.
    GroundRules,
}

/// Default PSL phrasings, in match order.
pub const PSL_PATTERNS: [(Marker, &str); 10] = [
    (Marker::RunStart, r"- Beginning rewrite evaluation run\.?$"),
    (
        Marker::RuleSelected,
        r"- Selected rule (\d+) for rewrite evaluation",
    ),
    (Marker::QueryFormula, r"- Query (\d+) -- Formula: (.+)$"),
    (Marker::AtomCount, r"- Query \d+ -- Atom Count: (\d+)$"),
    (Marker::BeginExplain, r"- Begin EXPLAIN$"),
    (
        Marker::Estimate,
        r"- Estimated Cost: (\d+\.?\d*), Startup Cost: (\d+\.?\d*), Estimated Rows: (\d+\.?\d*)$",
    ),
    (Marker::FirstResponse, r"- First result from query received"),
    (Marker::QueryComplete, r"- Query execution complete"),
    (Marker::ResultsReturned, r"- Got (\d+) results from query"),
    (
        Marker::GroundRules,
        r"- Generated (\d+) ground rules with query:",
    ),
];

static PSL_MARKERS: Lazy<MarkerTable> = Lazy::new(|| {
    MarkerTable::new(&PSL_PATTERNS).expect("built-in marker patterns are valid by construction")
});

static TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s").expect("timestamp pattern is valid by construction"));

/// Ordered list of (marker, regex) pairs. The first pattern that matches a line wins.
#[derive(Debug, Clone)]
pub struct MarkerTable {
    entries: Vec<(Marker, Regex)>,
}

impl Default for MarkerTable {
    /// The PSL phrasings in [`PSL_PATTERNS`].
    fn default() -> Self {
        PSL_MARKERS.clone()
    }
}

impl MarkerTable {
    /// Compiles a custom table. Patterns must provide the capture groups documented on
    /// [`Marker`]; missing groups surface later as schema mismatches.
    pub fn new(patterns: &[(Marker, &str)]) -> Result<Self, StatsError> {
        let entries = patterns
            .iter()
            .map(|(marker, pattern)| Ok((*marker, Regex::new(pattern)?)))
            .collect::<Result<Vec<_>, StatsError>>()?;
        Ok(Self { entries })
    }

    /// Returns the first marker whose pattern matches `line`, with its captures.
    pub fn match_line<'a>(&self, line: &'a str) -> Option<(Marker, Captures<'a>)> {
        self.entries
            .iter()
            .find_map(|(marker, re)| re.captures(line).map(|caps| (*marker, caps)))
    }
}

/// Leading integer token of a log line, if any.
pub fn line_timestamp(line: &str) -> Option<u64> {
    TIMESTAMP
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Truncates decimal text such as `1234.56` to its integer part.
///
/// Integer parts too large for an `i64` saturate to `i64::MAX` (or `i64::MIN`); `None` only for
/// text that is not a decimal number.
pub fn truncate_decimal(text: &str) -> Option<i64> {
    let integral = text.split('.').next().unwrap_or(text);
    let (negative, digits) = match integral.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, integral),
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.is_empty() {
        return Some(0);
    }
    match integral.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("`{text}` does not fit in 64 bits, saturating");
            Some(if negative { i64::MIN } else { i64::MAX })
        }
    }
}
