//! Parses the full search estimates of a log and prints the rewrite tree as JSON for the
//! search-space visualizer.

use anyhow::Context;
use psl_query_stats::{
    cli::{program_name, CliSpec},
    tree_to_json, SearchSpace,
};

const PRUNE_DUPS: &str = "--prune-dups";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let spec = CliSpec {
        program: program_name("search_space"),
        synopsis: "[--prune-dups] <output file>",
        toggles: &[PRUNE_DUPS],
        max_paths: Some(1),
    };
    let args = spec.parse_env_or_exit();
    let path = &args.paths[0];

    let space = SearchSpace::from_file(path)
        .with_context(|| format!("failed to parse full estimates from {path}"))?;
    let tree = space.build_tree(args.has(PRUNE_DUPS));
    println!("{}", tree_to_json(tree.as_ref())?);
    Ok(())
}
