//! This library parses logs of PSL query-rewrite experiments and reports how well cost-based
//! heuristics pick among the rewrites of each rule.
//!
//! A log is scanned once by an [`Extractor`] driven by a [`MarkerTable`] of log phrasings. Each
//! evaluation run (a rule, one of its rewrites and the rewritten query) becomes a [`RunRow`] of
//! observed timings and estimates. An [`Analysis`] then appends derived columns (ratios, total
//! time and score variants), ranks every rule's rewrites under each [`Metric`], and records how
//! far each heuristic's pick lands from the fastest and from the unrewritten run.
//!
//! Runs cut off before they complete (e.g. by a timeout) are kept as shorter rows and excluded
//! from every derived computation.
//!
//! ```rust
//! use psl_query_stats::{extract_str, Analysis, MarkerTable, StatsConfig};
//!
//! let log = "\
//! 100 [main] INFO  - Beginning rewrite evaluation run.
//! 101 [main] INFO  - Selected rule 1 for rewrite evaluation
//! 102 [main] INFO  - Query 0 -- Formula: ( A(x) & B(x) )
//! 103 [main] INFO  - Query 0 -- Atom Count: 2
//! 110 [main] INFO  - Begin EXPLAIN
//! 115 [main] INFO  - Estimated Cost: 100.00, Startup Cost: 20.00, Estimated Rows: 50
//! 120 [main] INFO  - First result from query received
//! 145 [main] INFO  - Query execution complete
//! 150 [main] INFO  - Got 5 results from query
//! 160 [main] INFO  - Generated 5 ground rules with query: ( A(x) & B(x) )
//! ";
//!
//! let extraction = extract_str(&MarkerTable::default(), log).unwrap();
//! let analysis = Analysis::new(extraction, &StatsConfig::default()).unwrap();
//! print!("{}", analysis.ranked_table().to_tsv());
//! ```

mod error;
pub use error::*;

mod schema;
pub use schema::*;

mod markers;
pub use markers::*;

mod extract;
pub use extract::*;

mod config;
pub use config::*;

mod derive;
pub use derive::*;

mod rank;
pub use rank::*;

mod table;
pub use table::*;

mod summary_stats;
pub use summary_stats::*;

mod aggregate;
pub use aggregate::*;

mod run_configs;
pub use run_configs::*;

mod search_space;
pub use search_space::*;

mod full_runs;
pub use full_runs::*;

mod phase_times;
pub use phase_times::*;

pub mod cli;
