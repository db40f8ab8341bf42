use crate::node::{Direction, NIL, NodeId};
use crate::rbt::RBTree;
use std::fmt::{self, Display, Write};

impl<K: Display, V, R> RBTree<K, V, R> {
    /// Draws the tree sideways, left child first. Black nodes print as
    /// `[key]`, red nodes as `(key)`, and a missing child whose sibling
    /// exists as `·`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String never fails
        let _ = self.write_tree(&mut out);
        out
    }

    pub fn debug_print(&self) {
        print!("{}", self.render());
    }

    fn write_tree(&self, out: &mut String) -> fmt::Result {
        let root = self.root_id();
        if root == NIL {
            return writeln!(out, "Empty tree");
        }
        self.write_label(out, root)?;
        self.write_children(out, root, "")
    }

    fn write_children(&self, out: &mut String, id: NodeId, prefix: &str) -> fmt::Result {
        let left = self.arena.child(id, Direction::Left);
        let right = self.arena.child(id, Direction::Right);
        if left == NIL && right == NIL {
            return Ok(());
        }

        for (child, last) in [(left, false), (right, true)] {
            let (branch, extend) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            write!(out, "{prefix}{branch}")?;
            if child == NIL {
                writeln!(out, "·")?;
                continue;
            }
            self.write_label(out, child)?;
            self.write_children(out, child, &format!("{prefix}{extend}"))?;
        }
        Ok(())
    }

    fn write_label(&self, out: &mut String, id: NodeId) -> fmt::Result {
        let key = self.arena.key(id);
        if self.arena.is_red(id) {
            writeln!(out, "({key})")
        } else {
            writeln!(out, "[{key}]")
        }
    }
}
