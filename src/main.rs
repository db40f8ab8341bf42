mod cli;
mod logging;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Commands};
use horizon_config::Config;
use horizon_follower::{Follower, RunSummary, describe, load_file};
use horizon_rbtree::{QueueRecorder, RBTree, SteppedTree, TreeConfig};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };
    logging::init_tracing(cli.log.as_deref(), &config.log.level);

    let tree_config = TreeConfig::new()
        .with_duplicate_keys(config.tree.allow_duplicate_keys && !cli.strict_keys);
    let check_invariants = config.follower.check_invariants && !cli.skip_invariants;

    match cli.command {
        Commands::Verify { fixtures, chain } => {
            verify(&fixtures, chain, tree_config, check_invariants)
        }
        Commands::Show { keys, delete } => show(&keys, &delete, tree_config),
        Commands::Describe { fixture } => {
            let actions = load_file(&fixture)?;
            print!("{}", describe(&actions));
            Ok(())
        }
    }
}

fn verify(
    fixtures: &[PathBuf],
    chain: bool,
    tree_config: TreeConfig,
    check_invariants: bool,
) -> Result<()> {
    let mut tree: SteppedTree<i64, ()> = RBTree::with_recorder(tree_config, QueueRecorder::new());
    for path in fixtures {
        if !chain {
            tree.clear();
        }
        let summary = run_fixture(path, &mut tree, check_invariants)
            .with_context(|| format!("fixture {} failed", path.display()))?;
        println!(
            "ok   {} ({} actions, {} steps, {} unchecked)",
            path.display(),
            summary.actions,
            summary.steps,
            summary.unchecked
        );
    }
    Ok(())
}

fn run_fixture(
    path: &Path,
    tree: &mut SteppedTree<i64, ()>,
    check_invariants: bool,
) -> Result<RunSummary> {
    let actions = load_file(path)?;
    let mut follower = Follower::from_actions(actions, tree)?.check_invariants(check_invariants);
    Ok(follower.run()?)
}

fn show(keys: &[i64], delete: &[i64], tree_config: TreeConfig) -> Result<()> {
    let mut tree: RBTree<i64, ()> = RBTree::with_config(tree_config);
    for &key in keys {
        tree.insert(key, ())?;
    }
    for key in delete {
        if !tree.delete(key) {
            tracing::warn!(key, "key not in tree, nothing deleted");
        }
    }

    print!("{}", tree.render());
    match tree.validate() {
        Ok(()) => {
            println!("valid red-black tree: {} nodes, height {}", tree.len(), tree.height());
            Ok(())
        }
        Err(violation) => bail!("invariant violated: {violation}"),
    }
}
