use crate::node::{Color, Direction, NIL, NodeId};
use crate::rbt::RBTree;
use std::cmp::Ordering;
use thiserror::Error;

/// A broken red-black or search-tree property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation<K> {
    #[error("the sentinel is not black")]
    RedSentinel,

    #[error("the root {0:?} is red")]
    RedRoot(K),

    #[error("the root {0:?} still records a parent")]
    DetachedRoot(K),

    #[error("red node {0:?} has a red child")]
    RedRedEdge(K),

    #[error("black height below {node:?} differs: {left} on the left, {right} on the right")]
    BlackHeight { node: K, left: usize, right: usize },

    #[error("a child of {parent:?} does not link back to it on its recorded side")]
    BrokenLink { parent: K },

    #[error("keys out of order: {previous:?} is followed by {next:?}")]
    OutOfOrder { previous: K, next: K },

    #[error("key {0:?} appears twice in a tree that forbids duplicates")]
    DuplicateKey(K),

    #[error("walked {counted} nodes but the tree holds {recorded}")]
    LengthMismatch { counted: usize, recorded: usize },
}

impl<K: Ord + Clone, V, R> RBTree<K, V, R> {
    /// Re-checks every structural invariant with a full walk.
    pub fn validate(&self) -> Result<(), InvariantViolation<K>> {
        if self.arena.color(NIL) != Color::Black {
            return Err(InvariantViolation::RedSentinel);
        }

        let root = self.root_id();
        if root == NIL {
            return match self.len() {
                0 => Ok(()),
                recorded => Err(InvariantViolation::LengthMismatch {
                    counted: 0,
                    recorded,
                }),
            };
        }

        let root_key = || self.arena.key(root).clone();
        if self.arena.color(root) != Color::Black {
            return Err(InvariantViolation::RedRoot(root_key()));
        }
        if self.arena.parent(root) != NIL || self.arena.from(root).is_some() {
            return Err(InvariantViolation::DetachedRoot(root_key()));
        }

        let mut counted = 0;
        self.check_subtree(root, &mut counted)?;
        if counted != self.len() {
            return Err(InvariantViolation::LengthMismatch {
                counted,
                recorded: self.len(),
            });
        }

        self.check_order()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Returns the black height of `id`, the sentinel counting as one.
    fn check_subtree(
        &self,
        id: NodeId,
        counted: &mut usize,
    ) -> Result<usize, InvariantViolation<K>> {
        if id == NIL {
            return Ok(1);
        }

        *counted += 1;
        if *counted > self.len() {
            // A cycle or a stray node; stop before walking forever
            return Err(InvariantViolation::LengthMismatch {
                counted: *counted,
                recorded: self.len(),
            });
        }

        let key = || self.arena.key(id).clone();
        let red = self.arena.is_red(id);
        for dir in [Direction::Left, Direction::Right] {
            let child = self.arena.child(id, dir);
            if child == NIL {
                continue;
            }
            let linked = self.arena.is_live(child)
                && self.arena.parent(child) == id
                && self.arena.from(child) == Some(dir);
            if !linked {
                return Err(InvariantViolation::BrokenLink { parent: key() });
            }
            if red && self.arena.is_red(child) {
                return Err(InvariantViolation::RedRedEdge(key()));
            }
        }

        let left = self.check_subtree(self.arena.child(id, Direction::Left), counted)?;
        let right = self.check_subtree(self.arena.child(id, Direction::Right), counted)?;
        if left != right {
            return Err(InvariantViolation::BlackHeight {
                node: key(),
                left,
                right,
            });
        }

        Ok(left + usize::from(!red))
    }

    fn check_order(&self) -> Result<(), InvariantViolation<K>> {
        let mut keys = self.keys();
        let Some(mut previous) = keys.next() else {
            return Ok(());
        };
        for next in keys {
            match previous.cmp(next) {
                Ordering::Greater => {
                    return Err(InvariantViolation::OutOfOrder {
                        previous: previous.clone(),
                        next: next.clone(),
                    });
                }
                Ordering::Equal if !self.config().allow_duplicate_keys => {
                    return Err(InvariantViolation::DuplicateKey(next.clone()));
                }
                _ => {}
            }
            previous = next;
        }
        Ok(())
    }
}
