//! A red-black tree that can report every decision it takes.
//!
//! Attach a [`StepRecorder`] with [`RBTree::with_recorder`] and open the
//! recording to receive one event per descent hop, match and rebalancing
//! case.

mod error;
mod node;
mod rbt;
mod recorder;
mod render;
mod traversal;
mod validate;

pub use error::{TreeError, TreeResult};
pub use node::{Color, Direction, NodeHandle, Orientation};
pub use rbt::{RBTree, SteppedTree, TreeConfig};
pub use recorder::{
    DeleteFixup, InsertFixup, NoopRecorder, Placement, QueueRecorder, Recording, Step,
    StepRecorder,
};
pub use traversal::{Iter, PostOrder, PreOrder};
pub use validate::InvariantViolation;
