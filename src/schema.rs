//! Declared row schema: base columns, cell values and run rows.

use std::fmt::{self, Display};

//=================
// Column

/// Base columns extracted from a log, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    RuleId,
    RewriteId,
    Formula,
    AtomCount,
    ExplainTime,
    EstimatedCost,
    StartupCost,
    EstimatedRows,
    FirstResponseTime,
    ActualTime,
    ActualRows,
    InstantiationTime,
    FinalGroundCount,
}

/// All base columns in declared order. A complete row has exactly this many cells before
/// derived columns are appended.
pub const BASE_COLUMNS: [Column; 13] = [
    Column::RuleId,
    Column::RewriteId,
    Column::Formula,
    Column::AtomCount,
    Column::ExplainTime,
    Column::EstimatedCost,
    Column::StartupCost,
    Column::EstimatedRows,
    Column::FirstResponseTime,
    Column::ActualTime,
    Column::ActualRows,
    Column::InstantiationTime,
    Column::FinalGroundCount,
];

/// Width of the base schema.
pub const BASE_WIDTH: usize = BASE_COLUMNS.len();

/// Base columns that are observations of a run (everything after the identity columns).
pub const OBSERVED_STATS: [Column; 9] = [
    Column::ExplainTime,
    Column::EstimatedCost,
    Column::StartupCost,
    Column::EstimatedRows,
    Column::FirstResponseTime,
    Column::ActualTime,
    Column::ActualRows,
    Column::InstantiationTime,
    Column::FinalGroundCount,
];

impl Column {
    /// Position of the column within a row.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::RuleId => "Rule ID",
            Column::RewriteId => "Rewrite ID",
            Column::Formula => "Formula",
            Column::AtomCount => "Atom Count",
            Column::ExplainTime => "Explain Time (ms)",
            Column::EstimatedCost => "Estimated Cost",
            Column::StartupCost => "Startup Cost",
            Column::EstimatedRows => "Estimated Rows",
            Column::FirstResponseTime => "First Response Time (ms)",
            Column::ActualTime => "Actual Time (ms)",
            Column::ActualRows => "Actual Rows",
            Column::InstantiationTime => "Instantiation Time (ms)",
            Column::FinalGroundCount => "Final Ground Count",
        }
    }
}

//=================
// Value

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Decimal(f64),
    Text(String),
    /// Result of a division by zero, or of arithmetic on such a result.
    Undefined,
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the cell; `None` for text and undefined cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, Value::Undefined)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Undefined => f.write_str("NA"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Rounds `value` to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10_f64.powi(places as i32);
    (value * scale).round() / scale
}

//=================
// RunRow

/// One run (rule, rewrite, query) observed in a log.
///
/// Cells are only ever appended: the base columns first, then the derived, rank, misrank and
/// delta columns once the row has been analyzed. Incomplete rows keep only the base cells that
/// were captured before the run was cut off.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRow {
    values: Vec<Value>,
    complete: bool,
}

impl RunRow {
    pub(crate) fn new(values: Vec<Value>, complete: bool) -> Self {
        Self { values, complete }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn base(&self, column: Column) -> Option<&Value> {
        self.values.get(column.index())
    }

    pub fn rule_id(&self) -> Option<i64> {
        self.base(Column::RuleId).and_then(Value::as_int)
    }

    pub fn rewrite_id(&self) -> Option<i64> {
        self.base(Column::RewriteId).and_then(Value::as_int)
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Typed view of the base columns; `None` for incomplete rows.
    pub fn observed(&self) -> Option<Observed> {
        if !self.complete {
            return None;
        }
        let int = |column: Column| self.base(column).and_then(Value::as_int);
        let formula = match self.base(Column::Formula)? {
            Value::Text(formula) => formula.clone(),
            _ => return None,
        };
        Some(Observed {
            rule_id: int(Column::RuleId)?,
            rewrite_id: int(Column::RewriteId)?,
            formula,
            atom_count: int(Column::AtomCount)?,
            explain_time: int(Column::ExplainTime)?,
            estimated_cost: int(Column::EstimatedCost)?,
            startup_cost: int(Column::StartupCost)?,
            estimated_rows: int(Column::EstimatedRows)?,
            first_response_time: int(Column::FirstResponseTime)?,
            actual_time: int(Column::ActualTime)?,
            actual_rows: int(Column::ActualRows)?,
            instantiation_time: int(Column::InstantiationTime)?,
            final_ground_count: int(Column::FinalGroundCount)?,
        })
    }
}

/// Typed base columns of a complete [`RunRow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observed {
    pub rule_id: i64,
    pub rewrite_id: i64,
    pub formula: String,
    pub atom_count: i64,
    pub explain_time: i64,
    pub estimated_cost: i64,
    pub startup_cost: i64,
    pub estimated_rows: i64,
    pub first_response_time: i64,
    pub actual_time: i64,
    pub actual_rows: i64,
    pub instantiation_time: i64,
    pub final_ground_count: i64,
}

impl Observed {
    pub fn total_time(&self) -> i64 {
        self.actual_time + self.instantiation_time
    }
}
