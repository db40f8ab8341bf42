use crate::error::{TreeError, TreeResult};
use crate::node::{Arena, Color, Direction, NIL, NodeHandle, NodeId, Orientation};
use crate::recorder::{DeleteFixup, InsertFixup, NoopRecorder, QueueRecorder, Recording, StepRecorder};
use std::cmp::Ordering;

/// Tree policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Accept keys equal to one already present. Equal keys descend left.
    pub allow_duplicate_keys: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            allow_duplicate_keys: true,
        }
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duplicate_keys(mut self, allow: bool) -> Self {
        self.allow_duplicate_keys = allow;
        self
    }
}

/// Red-black tree whose decisions can be recorded step by step.
///
/// Nodes live in an arena owned by the tree; slot 0 is this tree's black
/// sentinel and stands in for every absent child. `R` receives the steps
/// while recording is open.
#[derive(Debug, Clone)]
pub struct RBTree<K, V, R = NoopRecorder> {
    root: NodeId,
    pub(crate) arena: Arena<K, V>,
    pub(crate) config: TreeConfig,
    recording: Recording<R>,
}

/// A tree that buffers its steps for later inspection.
pub type SteppedTree<K, V> = RBTree<K, V, QueueRecorder<K>>;

impl<K: Ord, V> RBTree<K, V> {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            root: NIL,
            arena: Arena::new(),
            config,
            recording: Recording::Absent,
        }
    }
}

impl<K: Ord, V> Default for RBTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, R> RBTree<K, V, R> {
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root == NIL
    }

    /// Drops every node. Outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = NIL;
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_enabled()
    }

    /// Stops recording. Steps already buffered stay in the recorder.
    pub fn close_recording(&mut self) {
        self.recording.close();
    }

    pub fn recorder(&self) -> Option<&R> {
        self.recording.recorder()
    }

    pub fn recorder_mut(&mut self) -> Option<&mut R> {
        self.recording.recorder_mut()
    }

    pub fn root(&self) -> Option<NodeHandle> {
        self.handle(self.root)
    }

    pub fn entry(&self, handle: NodeHandle) -> Option<(&K, &V)> {
        self.arena.entry(handle.0)
    }

    pub fn key(&self, handle: NodeHandle) -> Option<&K> {
        self.entry(handle).map(|(key, _)| key)
    }

    pub fn value(&self, handle: NodeHandle) -> Option<&V> {
        self.entry(handle).map(|(_, value)| value)
    }

    pub fn value_mut(&mut self, handle: NodeHandle) -> Option<&mut V> {
        self.arena.value_mut(handle.0)
    }

    pub fn color(&self, handle: NodeHandle) -> Option<Color> {
        self.arena
            .is_live(handle.0)
            .then(|| self.arena.color(handle.0))
    }

    pub fn child(&self, handle: NodeHandle, dir: Direction) -> Option<NodeHandle> {
        if !self.arena.is_live(handle.0) {
            return None;
        }
        self.handle(self.arena.child(handle.0, dir))
    }

    pub fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        if !self.arena.is_live(handle.0) {
            return None;
        }
        self.handle(self.arena.parent(handle.0))
    }

    /// Side of its parent the node hangs from; `None` for the root.
    pub fn direction(&self, handle: NodeHandle) -> Option<Direction> {
        if !self.arena.is_live(handle.0) {
            return None;
        }
        self.arena.from(handle.0)
    }

    fn handle(&self, id: NodeId) -> Option<NodeHandle> {
        self.arena.is_live(id).then_some(NodeHandle(id))
    }

    /// Promotes `node` into its parent's position.
    fn rotate_up(&mut self, node: NodeId) {
        let Some(side) = self.arena.from(node) else {
            return;
        };
        let parent = self.arena.parent(node);
        let grandparent = self.arena.parent(parent);
        let parent_side = self.arena.from(parent);

        let inner = self.arena.child(node, side.opposite());
        self.arena.set_child(parent, side, inner);
        self.arena.set_child(node, side.opposite(), parent);

        match parent_side {
            Some(dir) => self.arena.set_child(grandparent, dir, node),
            None => {
                self.arena.make_root(node);
                self.root = node;
            }
        }
        tracing::trace!(node, parent, "rotated up");
    }

    /// Unlinks `id` from its parent and frees its slot.
    fn detach(&mut self, id: NodeId) {
        match self.arena.from(id) {
            Some(dir) => {
                let parent = self.arena.parent(id);
                self.arena.set_child(parent, dir, NIL);
            }
            None => self.root = NIL,
        }
        self.arena.release(id);
    }
}

impl<K: Ord, V, R: StepRecorder<K>> RBTree<K, V, R> {
    pub fn with_recorder(config: TreeConfig, recorder: R) -> Self {
        Self {
            root: NIL,
            arena: Arena::new(),
            config,
            recording: Recording::attached(recorder),
        }
    }

    /// Starts reporting steps to the recorder.
    pub fn open_recording(&mut self) -> TreeResult<(), K> {
        if self.recording.open() {
            Ok(())
        } else {
            Err(TreeError::RecordingMisuse)
        }
    }

    pub fn insert(&mut self, key: K, value: V) -> TreeResult<NodeHandle, K> {
        if self.root == NIL {
            let id = self.arena.alloc(key, value);
            self.arena.set_color(id, Color::Black);
            self.arena.make_root(id);
            self.root = id;
            self.recording.emit(|r| r.init_tree());
            return Ok(NodeHandle(id));
        }

        // Find the insert point; equal keys go left
        let mut current = self.root;
        let dir = loop {
            let ordering = key.cmp(self.arena.key(current));
            if ordering == Ordering::Equal && !self.config.allow_duplicate_keys {
                tracing::debug!("rejected duplicated key");
                return Err(TreeError::DuplicateKey(key));
            }
            let dir = match ordering {
                Ordering::Greater => Direction::Right,
                _ => Direction::Left,
            };
            let next = self.arena.child(current, dir);
            if next == NIL {
                break dir;
            }
            self.recording
                .emit(|r| r.search_node(self.arena.key(current), dir, false));
            current = next;
        };
        self.recording
            .emit(|r| r.search_node(self.arena.key(current), dir, true));

        let id = self.arena.alloc(key, value);
        self.arena.set_child(current, dir, id);
        self.insert_fixup(id);
        Ok(NodeHandle(id))
    }

    fn insert_fixup(&mut self, mut node: NodeId) {
        loop {
            let parent = self.arena.parent(node);
            if !self.arena.is_red(parent) {
                break;
            }
            // A red parent is never the root, so both sides are known
            let (Some(parent_side), Some(node_side)) =
                (self.arena.from(parent), self.arena.from(node))
            else {
                break;
            };
            let grandparent = self.arena.parent(parent);
            let uncle = self.arena.child(grandparent, parent_side.opposite());
            let orientation = Orientation::new(parent_side, node_side);

            if self.arena.is_red(uncle) {
                self.recording
                    .emit(|r| r.fixup_tree(InsertFixup::RedUncle, orientation));
                self.arena.set_color(parent, Color::Black);
                self.arena.set_color(uncle, Color::Black);
                if grandparent == self.root {
                    self.recording.emit(|r| r.blacken_root());
                    break;
                }
                self.arena.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            self.recording
                .emit(|r| r.fixup_tree(InsertFixup::BlackUncle, orientation));
            let top = if orientation.is_straight() {
                self.rotate_up(parent);
                parent
            } else {
                self.rotate_up(node);
                self.rotate_up(node);
                node
            };
            self.arena.set_color(top, Color::Black);
            self.arena.set_color(grandparent, Color::Red);
            break;
        }
    }

    /// Looks `key` up, reporting every hop.
    pub fn search(&mut self, key: &K) -> Option<NodeHandle> {
        self.descend(key).map(NodeHandle)
    }

    fn descend(&mut self, key: &K) -> Option<NodeId> {
        let mut current = self.root;
        while current != NIL {
            let dir = match key.cmp(self.arena.key(current)) {
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
                Ordering::Equal => {
                    self.recording.emit(|r| r.match_node(self.arena.key(current)));
                    return Some(current);
                }
            };
            self.recording
                .emit(|r| r.search_node(self.arena.key(current), dir, false));
            current = self.arena.child(current, dir);
        }
        self.recording.emit(|r| r.unmatch_node());
        None
    }

    fn find(&self, key: &K) -> NodeId {
        let mut current = self.root;
        while current != NIL {
            current = match key.cmp(self.arena.key(current)) {
                Ordering::Less => self.arena.child(current, Direction::Left),
                Ordering::Greater => self.arena.child(current, Direction::Right),
                Ordering::Equal => return current,
            };
        }
        NIL
    }

    /// Lookup without recording.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.arena.entry(self.find(key)).map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key);
        self.arena.value_mut(id)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key) != NIL
    }

    /// Removes one entry equal to `key`. Returns false when none exists.
    pub fn delete(&mut self, key: &K) -> bool {
        let Some(matched) = self.descend(key) else {
            tracing::debug!("nothing to delete");
            return false;
        };

        // The excised node has at most one child: the in-order predecessor
        // when the match has a left subtree, otherwise the match itself.
        let mut victim = matched;
        let left = self.arena.child(matched, Direction::Left);
        if left != NIL {
            victim = left;
            loop {
                self.recording
                    .emit(|r| r.search_node(self.arena.key(victim), Direction::Right, false));
                let next = self.arena.child(victim, Direction::Right);
                if next == NIL {
                    break;
                }
                victim = next;
            }
            self.recording
                .emit(|r| r.replace_node(self.arena.key(matched), self.arena.key(victim)));
        }

        // A lone child is a red leaf under a black node
        let child = match self.arena.child(victim, Direction::Left) {
            NIL => self.arena.child(victim, Direction::Right),
            left => left,
        };
        if child != NIL {
            self.recording
                .emit(|r| r.replace_node(self.arena.key(victim), self.arena.key(child)));
            self.recording.emit(|r| r.remove_node(self.arena.key(child)));
        } else {
            self.recording.emit(|r| r.remove_node(self.arena.key(victim)));
        }

        // Slide the doomed entry down to the node being excised
        self.arena.swap_entries(matched, victim);
        if child != NIL {
            self.arena.swap_entries(victim, child);
            self.detach(child);
            return true;
        }
        if self.arena.is_red(victim) || victim == self.root {
            self.detach(victim);
            return true;
        }

        // Black leaf: its position carries an extra black until absorbed
        self.delete_fixup(victim);
        self.detach(victim);
        true
    }

    fn delete_fixup(&mut self, mut node: NodeId) {
        while node != self.root {
            let Some(side) = self.arena.from(node) else {
                break;
            };
            let parent = self.arena.parent(node);
            let far_side = side.opposite();
            let sibling = self.arena.child(parent, far_side);
            let straight = Orientation::new(far_side, far_side);

            if self.arena.is_red(sibling) {
                self.recording
                    .emit(|r| r.fixup_delete(DeleteFixup::RedSibling, straight));
                self.rotate_up(sibling);
                self.arena.set_color(sibling, Color::Black);
                self.arena.set_color(parent, Color::Red);
                continue;
            }

            let far = self.arena.child(sibling, far_side);
            let near = self.arena.child(sibling, side);
            if !self.arena.is_red(far) && !self.arena.is_red(near) {
                self.recording
                    .emit(|r| r.fixup_delete(DeleteFixup::BlackNephews, straight));
                self.arena.set_color(sibling, Color::Red);
                if self.arena.is_red(parent) {
                    self.arena.set_color(parent, Color::Black);
                    break;
                }
                node = parent;
                continue;
            }

            let parent_color = self.arena.color(parent);
            if self.arena.is_red(far) {
                self.recording
                    .emit(|r| r.fixup_delete(DeleteFixup::BlackSibling, straight));
                self.rotate_up(sibling);
                self.arena.set_color(sibling, parent_color);
                self.arena.set_color(far, Color::Black);
            } else {
                let zigzag = Orientation::new(far_side, side);
                self.recording
                    .emit(|r| r.fixup_delete(DeleteFixup::BlackSibling, zigzag));
                self.rotate_up(near);
                self.rotate_up(near);
                self.arena.set_color(near, parent_color);
            }
            self.arena.set_color(parent, Color::Black);
            break;
        }
    }
}
