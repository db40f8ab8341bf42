use crate::node::{Arena, Direction, NIL, NodeId};
use crate::rbt::RBTree;

/// In-order iterator over `(key, value)` pairs.
pub struct Iter<'a, K, V> {
    arena: &'a Arena<K, V>,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(arena: &'a Arena<K, V>, root: NodeId) -> Self {
        let mut iter = Self {
            arena,
            stack: Vec::new(),
            remaining: arena.len(),
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut id: NodeId) {
        while id != NIL {
            self.stack.push(id);
            id = self.arena.child(id, Direction::Left);
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.push_left_spine(self.arena.child(id, Direction::Right));
        self.remaining = self.remaining.saturating_sub(1);
        self.arena.entry(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Node-left-right walk, the order a tree is printed in.
pub struct PreOrder<'a, K, V> {
    arena: &'a Arena<K, V>,
    stack: Vec<NodeId>,
}

impl<'a, K, V> Iterator for PreOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        for dir in [Direction::Right, Direction::Left] {
            let child = self.arena.child(id, dir);
            if child != NIL {
                self.stack.push(child);
            }
        }
        self.arena.entry(id)
    }
}

/// Left-right-node walk.
pub struct PostOrder<'a, K, V> {
    arena: &'a Arena<K, V>,
    // (node, children already pushed)
    stack: Vec<(NodeId, bool)>,
}

impl<'a, K, V> Iterator for PostOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, expanded)) = self.stack.pop() {
            if expanded {
                return self.arena.entry(id);
            }
            self.stack.push((id, true));
            for dir in [Direction::Right, Direction::Left] {
                let child = self.arena.child(id, dir);
                if child != NIL {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

impl<K, V, R> RBTree<K, V, R> {
    /// Entries in ascending key order. Equal keys come out in insertion order
    /// reversed, since later duplicates descend left.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.root_id())
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    pub fn pre_order(&self) -> PreOrder<'_, K, V> {
        let root = self.root_id();
        PreOrder {
            arena: &self.arena,
            stack: if root == NIL { Vec::new() } else { vec![root] },
        }
    }

    pub fn post_order(&self) -> PostOrder<'_, K, V> {
        let root = self.root_id();
        PostOrder {
            arena: &self.arena,
            stack: if root == NIL {
                Vec::new()
            } else {
                vec![(root, false)]
            },
        }
    }

    /// Smallest key, following left links from the root.
    pub fn first_key(&self) -> Option<&K> {
        self.extreme(Direction::Left)
    }

    pub fn last_key(&self) -> Option<&K> {
        self.extreme(Direction::Right)
    }

    fn extreme(&self, dir: Direction) -> Option<&K> {
        let mut id = self.root_id();
        if id == NIL {
            return None;
        }
        loop {
            let next = self.arena.child(id, dir);
            if next == NIL {
                return self.arena.entry(id).map(|(key, _)| key);
            }
            id = next;
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack = Vec::new();
        if self.root_id() != NIL {
            stack.push((self.root_id(), 1));
        }
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for dir in [Direction::Left, Direction::Right] {
                let child = self.arena.child(id, dir);
                if child != NIL {
                    stack.push((child, depth + 1));
                }
            }
        }
        deepest
    }
}

impl<'a, K, V, R> IntoIterator for &'a RBTree<K, V, R> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
