use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "horizon",
    about = "Horizon: a red-black tree that checks its own steps against behavior fixtures",
    version
)]
pub struct Cli {
    /// Configuration file; searched in the usual places when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, overrides HORIZON_LOG and the configuration file
    #[arg(long, global = true)]
    pub log: Option<String>,

    /// Reject keys equal to one already in the tree
    #[arg(long, global = true)]
    pub strict_keys: bool,

    /// Do not re-validate the tree after every action
    #[arg(long, global = true)]
    pub skip_invariants: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run fixture files, each against a fresh tree
    Verify {
        /// Fixture files
        #[arg(required = true)]
        fixtures: Vec<PathBuf>,

        /// Run all fixtures against one tree, in the order given
        #[arg(long)]
        chain: bool,
    },

    /// Insert keys, delete some, and draw the resulting tree
    Show {
        /// Keys to insert, in order
        #[arg(allow_negative_numbers = true)]
        keys: Vec<i64>,

        /// Key to delete once every key is inserted (repeatable)
        #[arg(long = "delete", value_name = "KEY", allow_negative_numbers = true)]
        delete: Vec<i64>,
    },

    /// Print a fixture's actions and steps in prose
    Describe {
        /// Fixture file
        fixture: PathBuf,
    },
}
