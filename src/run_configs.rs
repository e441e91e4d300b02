//! Rule configurations for follow-up full runs: which rewrite to use for each rule.

use crate::{Analysis, Metric, RankColumn, Value};
use std::collections::BTreeSet;

const RULE_DELIM: &str = "_";
const REWRITE_DELIM: &str = ":";

/// A set of (rule ID, rewrite ID) choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleConfig(pub BTreeSet<(i64, i64)>);

impl RuleConfig {
    /// `rule:rewrite` pairs in ascending order joined by `_`, e.g. `1:0_2:3`.
    pub fn format(&self) -> String {
        self.0
            .iter()
            .map(|(rule_id, rewrite_id)| format!("{rule_id}{REWRITE_DELIM}{rewrite_id}"))
            .collect::<Vec<_>>()
            .join(RULE_DELIM)
    }
}

/// The configurations worth running in full after a rewrite-evaluation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfigs {
    /// Every rule without rewrites.
    pub base: RuleConfig,
    /// Each rule's empirically fastest rewrite.
    pub fastest: RuleConfig,
    /// Each rule's rewrite picked by the chosen heuristic.
    pub chosen: RuleConfig,
}

impl RunConfigs {
    /// Builds the configurations from the complete rows of `analysis`.
    pub fn new(analysis: &Analysis, chosen: Metric) -> Self {
        let rank_0 = |metric: Metric| {
            let index = RankColumn::Rank(metric).index();
            RuleConfig(
                analysis
                    .complete_rows()
                    .filter(|row| row.get(index) == Some(&Value::Int(0)))
                    .filter_map(|row| row.rule_id().zip(row.rewrite_id()))
                    .collect(),
            )
        };

        let base = RuleConfig(
            analysis
                .complete_rows()
                .filter_map(|row| row.rule_id())
                .map(|rule_id| (rule_id, 0))
                .collect(),
        );

        Self {
            base,
            fastest: rank_0(Metric::Actual),
            chosen: rank_0(chosen),
        }
    }

    /// `(id, formatted config)` lines in `base`, `fastest`, `chosen` order.
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("base", self.base.format()),
            ("fastest", self.fastest.format()),
            ("chosen", self.chosen.format()),
        ]
    }
}
