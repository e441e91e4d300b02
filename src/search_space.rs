//! Search-space tree of query rewrites, built from the `FullEstimate` lines of a PSL log.
//!
//! The tree is consumed by the search-space visualizer as JSON shaped as
//! `{index, count, cost, rows, query, children: [...]}`.

use crate::{truncate_decimal, StatsError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

static FULL_ESTIMATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"FullEstimate -- (.+)$").expect("full estimate pattern is valid by construction")
});

/// One candidate query of the full search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateRow {
    pub index: i64,
    pub query: String,
    /// Atom count.
    pub count: i64,
    pub cost: i64,
    pub rows: i64,
}

/// The `FullEstimate` table of a log: its header line and rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSpace {
    pub headers: Vec<String>,
    pub rows: Vec<EstimateRow>,
}

impl SearchSpace {
    /// Parses `FullEstimate -- ` lines. The first one is the header; every following one must
    /// carry the next sequential index.
    pub fn from_lines<S: AsRef<str>>(
        lines: impl IntoIterator<Item = S>,
    ) -> Result<Self, StatsError> {
        let mut space = Self::default();
        let mut saw_header = false;

        for (idx, line) in lines.into_iter().enumerate() {
            let line_number = idx + 1;
            let line = line.as_ref().trim();
            let fields = match FULL_ESTIMATE.captures(line).and_then(|caps| caps.get(1)) {
                Some(m) => m.as_str(),
                None => continue,
            };
            let parts: Vec<&str> = fields.split('\t').collect();

            if !saw_header {
                space.headers = parts.iter().map(|p| (*p).to_owned()).collect();
                saw_header = true;
                continue;
            }

            let row = parse_estimate(&parts, line_number)?;
            if row.index != space.rows.len() as i64 {
                return Err(StatsError::BadIndex {
                    found: row.index,
                    expected: space.rows.len(),
                });
            }
            space.rows.push(row);
        }

        log::debug!("parsed {} full estimates", space.rows.len());
        Ok(space)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StatsError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        Self::from_lines(lines)
    }

    /// Builds the rewrite tree, or `None` if there are no estimates.
    ///
    /// The root is the first query with the most atoms. Each level down has one atom fewer, and
    /// a query becomes a child of every query on the level above whose conjuncts are a superset
    /// of its own. With `prune_dups`, a query is attached only under its first such parent.
    pub fn build_tree(&self, prune_dups: bool) -> Option<TreeNode> {
        let max_atoms = self.rows.iter().map(|row| row.count).max()?;
        let tokens: Vec<BTreeSet<&str>> = self.rows.iter().map(|row| tokenize(&row.query)).collect();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); self.rows.len()];

        let level_nodes = |atom_count: i64| -> Vec<usize> {
            self.rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.count == atom_count)
                .map(|(idx, _)| idx)
                .collect()
        };

        let mut parents = level_nodes(max_atoms);
        let root = *parents.first()?;

        for atom_count in (1..max_atoms).rev() {
            let nodes = level_nodes(atom_count);
            for node in &nodes {
                for parent in &parents {
                    if children[*parent].contains(node) {
                        continue;
                    }
                    if tokens[*parent].is_superset(&tokens[*node]) {
                        children[*parent].push(*node);
                        if prune_dups {
                            break;
                        }
                    }
                }
            }
            parents = nodes;
        }

        Some(TreeNode::materialize(root, &self.rows, &children))
    }
}

fn parse_estimate(parts: &[&str], line_number: usize) -> Result<EstimateRow, StatsError> {
    let [index, query, count, cost, rows, ..] = parts else {
        return Err(StatsError::BadEstimateLine {
            line_number,
            fields: parts.len(),
        });
    };
    let bad = |text: &str| StatsError::BadNumber {
        line_number,
        text: text.to_owned(),
    };
    Ok(EstimateRow {
        index: index.parse().map_err(|_| bad(index))?,
        query: (*query).to_owned(),
        count: count.parse().map_err(|_| bad(count))?,
        cost: truncate_decimal(cost).ok_or_else(|| bad(cost))?,
        rows: truncate_decimal(rows).ok_or_else(|| bad(rows))?,
    })
}

/// Conjuncts of a formula such as `( A(x) & B(x, y) )`.
fn tokenize(formula: &str) -> BTreeSet<&str> {
    let formula = formula.trim();
    let formula = formula.strip_prefix("( ").unwrap_or(formula);
    let formula = formula.strip_suffix(" )").unwrap_or(formula);
    formula.split(" & ").collect()
}

//=================
// TreeNode

/// Node of the serialized tree. A query reachable through several parents is repeated under
/// each of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub index: i64,
    pub count: i64,
    pub cost: i64,
    pub rows: i64,
    pub query: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn materialize(idx: usize, rows: &[EstimateRow], children: &[Vec<usize>]) -> Self {
        let row = &rows[idx];
        Self {
            index: row.index,
            count: row.count,
            cost: row.cost,
            rows: row.rows,
            query: row.query.clone(),
            children: children[idx]
                .iter()
                .map(|child| Self::materialize(*child, rows, children))
                .collect(),
        }
    }
}

/// Pretty JSON with four-space indentation; `null` for an empty tree.
pub fn tree_to_json(tree: Option<&TreeNode>) -> Result<String, StatsError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    tree.serialize(&mut ser)?;
    Ok(String::from_utf8(buf).expect("serde_json emits valid UTF-8"))
}
