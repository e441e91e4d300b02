//! Builds synthetic PSL rewrite-evaluation logs.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fmt::Write;

const LOGGER: &str = "[main] INFO  org.linqs.psl.grounding.QueryRewriter";

/// Observations of one evaluation run, as they should come out of the extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSpec {
    pub rule_id: i64,
    pub rewrite_id: i64,
    pub formula: String,
    pub atom_count: i64,
    pub explain_time: u64,
    pub cost: f64,
    pub startup_cost: f64,
    pub estimated_rows: f64,
    pub first_response_time: u64,
    pub actual_time: u64,
    pub actual_rows: u64,
    pub instantiation_time: u64,
    pub ground_count: u64,
}

impl RunSpec {
    /// A run with small, non-zero observations.
    pub fn new(rule_id: i64, rewrite_id: i64) -> Self {
        Self {
            rule_id,
            rewrite_id,
            formula: "( A(x) & B(x, y) )".to_owned(),
            atom_count: 2,
            explain_time: 5,
            cost: 100.0,
            startup_cost: 20.0,
            estimated_rows: 50.0,
            first_response_time: 5,
            actual_time: 30,
            actual_rows: 5,
            instantiation_time: 10,
            ground_count: 5,
        }
    }

    pub fn with_formula(mut self, formula: &str, atom_count: i64) -> Self {
        self.formula = formula.to_owned();
        self.atom_count = atom_count;
        self
    }

    pub fn with_estimates(mut self, cost: f64, startup_cost: f64, estimated_rows: f64) -> Self {
        self.cost = cost;
        self.startup_cost = startup_cost;
        self.estimated_rows = estimated_rows;
        self
    }

    pub fn with_times(mut self, actual_time: u64, instantiation_time: u64) -> Self {
        self.actual_time = actual_time;
        self.instantiation_time = instantiation_time;
        self.first_response_time = self.first_response_time.min(actual_time);
        self
    }

    pub fn with_actual_rows(mut self, actual_rows: u64) -> Self {
        self.actual_rows = actual_rows;
        self
    }
}

/// Accumulates log lines with a monotonically increasing millisecond clock.
#[derive(Debug, Clone)]
pub struct LogBuilder {
    lines: Vec<String>,
    clock: u64,
}

impl Default for LogBuilder {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl LogBuilder {
    pub fn new(start_clock: u64) -> Self {
        Self {
            lines: Vec::new(),
            clock: start_clock,
        }
    }

    /// Appends a complete run.
    pub fn run(&mut self, spec: &RunSpec) -> &mut Self {
        let lines = Self::run_lines(spec, self.clock);
        self.clock = lines.last().map(|(ts, _)| ts + 1).unwrap_or(self.clock);
        self.push_all(lines);
        self
    }

    /// Appends only the first `n_lines` lines of a run, as if it timed out.
    pub fn truncated_run(&mut self, spec: &RunSpec, n_lines: usize) -> &mut Self {
        let mut lines = Self::run_lines(spec, self.clock);
        lines.truncate(n_lines);
        self.clock = lines.last().map(|(ts, _)| ts + 1).unwrap_or(self.clock);
        self.push_all(lines);
        self
    }

    /// Appends `text` verbatim, without a timestamp.
    pub fn raw(&mut self, text: &str) -> &mut Self {
        self.lines.push(text.to_owned());
        self
    }

    /// Appends a timestamped line with the given message.
    pub fn message(&mut self, message: &str) -> &mut Self {
        let ts = self.clock;
        self.push_all(vec![(ts, message.to_owned())]);
        self
    }

    pub fn build(&self) -> String {
        let mut log = self.lines.join("\n");
        log.push('\n');
        log
    }

    fn push_all(&mut self, lines: Vec<(u64, String)>) {
        for (ts, message) in lines {
            self.lines.push(format!("{ts} {LOGGER}  - {message}"));
        }
    }

    /// The ten marker lines of a run starting at `t0`, with their timestamps.
    fn run_lines(spec: &RunSpec, t0: u64) -> Vec<(u64, String)> {
        let t_estimate = t0 + spec.explain_time;
        let t_first = t_estimate + spec.first_response_time;
        let t_complete = t_estimate + spec.actual_time;
        let t_ground = t_complete + spec.instantiation_time;

        vec![
            (t0, "Beginning rewrite evaluation run.".to_owned()),
            (
                t0,
                format!("Selected rule {} for rewrite evaluation", spec.rule_id),
            ),
            (
                t0,
                format!("Query {} -- Formula: {}", spec.rewrite_id, spec.formula),
            ),
            (
                t0,
                format!("Query {} -- Atom Count: {}", spec.rewrite_id, spec.atom_count),
            ),
            (t0, "Begin EXPLAIN".to_owned()),
            (
                t_estimate,
                format!(
                    "Estimated Cost: {:.2}, Startup Cost: {:.2}, Estimated Rows: {:.0}",
                    spec.cost, spec.startup_cost, spec.estimated_rows
                ),
            ),
            (t_first, "First result from query received".to_owned()),
            (t_complete, "Query execution complete".to_owned()),
            (
                t_complete,
                format!("Got {} results from query", spec.actual_rows),
            ),
            (
                t_ground,
                format!(
                    "Generated {} ground rules with query: {}",
                    spec.ground_count, spec.formula
                ),
            ),
        ]
    }
}

/// Number of lines [`LogBuilder::run`] emits per run.
pub const LINES_PER_RUN: usize = 10;

/// A log of `n_rules` rules with `n_rewrites` rewrites each (rewrite 0 included), with random
/// observations drawn from a generator seeded with `seed`. Every tenth run is cut off, except
/// for base runs.
pub fn synthetic_log(n_rules: i64, n_rewrites: i64, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = LogBuilder::default();

    for rule_id in 0..n_rules {
        let width = rng.gen_range(2..8);
        for rewrite_id in 0..n_rewrites {
            let atom_count = if rewrite_id == 0 {
                width
            } else {
                rng.gen_range(1..=width)
            };
            let mut formula = String::from("(");
            for atom in 0..atom_count {
                if atom > 0 {
                    formula.push_str(" &");
                }
                write!(formula, " P{atom}(x{atom}, y{atom})")
                    .expect("writing to a `String` succeeds");
            }
            formula.push_str(" )");

            let cost = rng.gen_range(10.0..100_000.0);
            let spec = RunSpec::new(rule_id, rewrite_id)
                .with_formula(&formula, atom_count)
                .with_estimates(cost, cost * rng.gen_range(0.0..0.5), rng.gen_range(1.0..10_000.0))
                .with_times(rng.gen_range(1..5_000), rng.gen_range(0..5_000))
                .with_actual_rows(rng.gen_range(0..10_000));

            if rewrite_id != 0 && (rule_id * n_rewrites + rewrite_id) % 10 == 9 {
                builder.truncated_run(&spec, rng.gen_range(1..LINES_PER_RUN));
            } else {
                builder.run(&spec);
            }
        }
    }

    builder.build()
}
