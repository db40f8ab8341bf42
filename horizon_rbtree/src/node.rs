use std::fmt;

pub(crate) type NodeId = u32;
/// Index of the per-tree sentinel. Every absent child points here.
pub(crate) const NIL: NodeId = 0;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// Which side of its parent a node hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Left => "<-",
            Direction::Right => "->",
        }
    }
}

/// Two consecutive directions, e.g. grandparent->parent then parent->node.
///
/// Equal directions describe a straight line (`LL`, `RR`) that one rotation
/// resolves; differing directions describe a zig-zag (`LR`, `RL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation {
    pub outer: Direction,
    pub inner: Direction,
}

impl Orientation {
    pub fn new(outer: Direction, inner: Direction) -> Self {
        Self { outer, inner }
    }

    pub fn is_straight(&self) -> bool {
        self.outer == self.inner
    }

    /// Parses `LL`, `LR`, `RL` or `RR`.
    pub fn from_letters(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let outer = Self::direction_of(chars.next()?)?;
        let inner = Self::direction_of(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self { outer, inner })
    }

    fn direction_of(letter: char) -> Option<Direction> {
        match letter {
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.outer.letter(), self.inner.letter())
    }
}

/// Opaque reference to a node of one tree.
///
/// A handle stays valid until the next successful delete or clear. After
/// that it may point at a recycled slot, or at a node whose entry was
/// replaced by its in-order predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub(crate) NodeId);

#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) parent: NodeId,
    pub(crate) color: Color,
    // None for the root and the sentinel
    pub(crate) from: Option<Direction>,
    // None for the sentinel and for vacant slots
    pub(crate) entry: Option<(K, V)>,
}

impl<K, V> Node<K, V> {
    fn sentinel() -> Self {
        Self {
            left: NIL,
            right: NIL,
            parent: NIL,
            color: Color::Black,
            from: None,
            entry: None,
        }
    }

    fn new(key: K, value: V) -> Self {
        Self {
            left: NIL,
            right: NIL,
            parent: NIL,
            color: Color::Red,
            from: None,
            entry: Some((key, value)),
        }
    }
}

/// Node storage for one tree. Slot 0 is that tree's sentinel.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K, V> {
    nodes: Vec<Node<K, V>>,
    free: Vec<NodeId>,
    len: usize,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::sentinel()],
            free: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[NIL as usize] = Node::sentinel();
        self.free.clear();
        self.len = 0;
    }

    /// Allocates a detached RED node.
    pub(crate) fn alloc(&mut self, key: K, value: V) -> NodeId {
        self.len += 1;
        match self.free.pop() {
            Some(id) => {
                self.nodes[id as usize] = Node::new(key, value);
                id
            }
            None => {
                let id = self.nodes.len() as NodeId;
                self.nodes.push(Node::new(key, value));
                id
            }
        }
    }

    /// Drops the entry held by `id` and recycles the slot.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<(K, V)> {
        debug_assert_ne!(id, NIL, "the sentinel is never released");
        let node = &mut self.nodes[id as usize];
        let entry = node.entry.take();
        node.left = NIL;
        node.right = NIL;
        node.parent = NIL;
        node.from = None;
        self.free.push(id);
        self.len -= 1;
        entry
    }

    pub(crate) fn is_live(&self, id: NodeId) -> bool {
        id != NIL
            && self
                .nodes
                .get(id as usize)
                .is_some_and(|node| node.entry.is_some())
    }

    #[cfg(test)]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id as usize]
    }

    #[inline]
    pub(crate) fn color(&self, id: NodeId) -> Color {
        self.nodes[id as usize].color
    }

    #[inline]
    pub(crate) fn is_red(&self, id: NodeId) -> bool {
        self.color(id) == Color::Red
    }

    #[inline]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        debug_assert!(id != NIL || color == Color::Black, "the sentinel stays black");
        if id != NIL {
            self.nodes[id as usize].color = color;
        }
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> NodeId {
        self.nodes[id as usize].parent
    }

    #[inline]
    pub(crate) fn from(&self, id: NodeId) -> Option<Direction> {
        self.nodes[id as usize].from
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, dir: Direction) -> NodeId {
        let node = &self.nodes[id as usize];
        match dir {
            Direction::Left => node.left,
            Direction::Right => node.right,
        }
    }

    /// Links `child` under `parent` on side `dir`. The sentinel's own links
    /// are never written.
    pub(crate) fn set_child(&mut self, parent: NodeId, dir: Direction, child: NodeId) {
        if parent != NIL {
            let node = &mut self.nodes[parent as usize];
            match dir {
                Direction::Left => node.left = child,
                Direction::Right => node.right = child,
            }
        }
        if child != NIL {
            let node = &mut self.nodes[child as usize];
            node.parent = parent;
            node.from = Some(dir);
        }
    }

    /// Marks `id` as the root: no parent, no side.
    pub(crate) fn make_root(&mut self, id: NodeId) {
        if id != NIL {
            let node = &mut self.nodes[id as usize];
            node.parent = NIL;
            node.from = None;
        }
    }

    pub(crate) fn entry(&self, id: NodeId) -> Option<(&K, &V)> {
        self.nodes
            .get(id as usize)
            .and_then(|node| node.entry.as_ref())
            .map(|(key, value)| (key, value))
    }

    pub(crate) fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.nodes
            .get_mut(id as usize)
            .and_then(|node| node.entry.as_mut())
            .map(|(_, value)| value)
    }

    /// Key of a live node. Callers only pass ids reached through tree links.
    pub(crate) fn key(&self, id: NodeId) -> &K {
        match &self.nodes[id as usize].entry {
            Some((key, _)) => key,
            None => unreachable!("node {id} holds no entry"),
        }
    }

    pub(crate) fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let taken = self.nodes[a as usize].entry.take();
        let other = std::mem::replace(&mut self.nodes[b as usize].entry, taken);
        self.nodes[a as usize].entry = other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_black_and_empty() {
        let arena: Arena<u64, ()> = Arena::new();
        assert_eq!(arena.color(NIL), Color::Black);
        assert!(arena.entry(NIL).is_none());
        assert!(!arena.is_live(NIL));
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn test_set_child_never_touches_sentinel() {
        let mut arena: Arena<u64, ()> = Arena::new();
        let a = arena.alloc(1, ());
        arena.set_child(a, Direction::Left, NIL);
        arena.set_child(NIL, Direction::Right, a);
        assert_eq!(arena.node(NIL).left, NIL);
        assert_eq!(arena.node(NIL).right, NIL);
        assert_eq!(arena.node(NIL).parent, NIL);
    }

    #[test]
    fn test_released_slots_are_recycled() {
        let mut arena: Arena<u64, &str> = Arena::new();
        let a = arena.alloc(1, "a");
        let _b = arena.alloc(2, "b");
        assert_eq!(arena.release(a), Some((1, "a")));
        assert!(!arena.is_live(a));
        let c = arena.alloc(3, "c");
        assert_eq!(c, a);
        assert_eq!(arena.entry(c), Some((&3, &"c")));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_orientation_letters() {
        let o = Orientation::from_letters("RL").expect("valid orientation");
        assert_eq!(o.outer, Direction::Right);
        assert_eq!(o.inner, Direction::Left);
        assert!(!o.is_straight());
        assert_eq!(o.to_string(), "RL");
        assert!(Orientation::from_letters("LLL").is_none());
        assert!(Orientation::from_letters("LX").is_none());
        assert!(Orientation::from_letters("L").is_none());
    }
}
