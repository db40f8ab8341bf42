//! Behavior fixtures for the horizon red-black tree.
//!
//! A fixture lists actions (`+ k`, `/ k`, `- k`) and, under each, the steps
//! the tree is expected to record while performing it. [`Follower`] replays
//! the actions on a [`horizon_rbtree::SteppedTree`] and reports the first
//! step that differs.

mod behavior;
mod error;
mod follower;
mod parser;

pub use behavior::{Action, ActionKind, Expectation, describe_step, parse_step};
pub use error::{FollowerError, FollowerResult, MismatchKind, VerificationMismatch};
pub use follower::{Follower, RunSummary, describe, load_file};
pub use parser::parse;

