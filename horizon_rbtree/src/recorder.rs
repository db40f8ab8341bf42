//! Step recording.
//!
//! The tree reports each decision it takes (which branch a descent follows,
//! which rebalancing case fires) to a [`StepRecorder`]. Production trees use
//! [`NoopRecorder`]; tests attach a [`QueueRecorder`] and compare the queued
//! [`Step`]s against an expected trace.

use crate::node::{Direction, Orientation};
use std::collections::VecDeque;
use std::fmt;

/// Color of the uncle when an insertion fixup case fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertFixup {
    RedUncle,
    BlackUncle,
}

impl InsertFixup {
    pub fn name(self) -> &'static str {
        match self {
            InsertFixup::RedUncle => "red-uncle",
            InsertFixup::BlackUncle => "black-uncle",
        }
    }
}

/// Case taken by one round of the deletion (double-black) loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteFixup {
    /// Red sibling, rotated above the parent.
    RedSibling,
    /// Black sibling with two black nephews, recolored red.
    BlackNephews,
    /// Black sibling with at least one red nephew.
    BlackSibling,
}

impl DeleteFixup {
    pub fn name(self) -> &'static str {
        match self {
            DeleteFixup::RedSibling => "red-sibling",
            DeleteFixup::BlackNephews => "black-nephews",
            DeleteFixup::BlackSibling => "black-sibling",
        }
    }
}

/// Where a freshly inserted node ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    Root,
    Leaf,
}

impl Placement {
    pub fn name(self) -> &'static str {
        match self {
            Placement::Root => "root",
            Placement::Leaf => "leaf",
        }
    }
}

/// Capability the tree calls into while recording is open.
///
/// Every method defaults to doing nothing.
pub trait StepRecorder<K> {
    /// The first node became the root of an empty tree.
    fn init_tree(&mut self) {}

    /// A descent left `key` through `direction`. `finished` marks the last
    /// hop of an insertion, after which the new node hangs as a leaf.
    fn search_node(&mut self, _key: &K, _direction: Direction, _finished: bool) {}

    fn match_node(&mut self, _key: &K) {}

    fn unmatch_node(&mut self) {}

    fn fixup_tree(&mut self, _kind: InsertFixup, _orientation: Orientation) {}

    /// The red-uncle case reached the root, which stays black.
    fn blacken_root(&mut self) {}

    /// The node holding `target` takes over the entry of `with`.
    fn replace_node(&mut self, _target: &K, _with: &K) {}

    /// The node that held `key` is excised from the tree.
    fn remove_node(&mut self, _key: &K) {}

    fn fixup_delete(&mut self, _kind: DeleteFixup, _orientation: Orientation) {}
}

/// Recorder that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl<K> StepRecorder<K> for NoopRecorder {}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<K> {
    SetAs(Placement),
    Search { key: K, direction: Direction },
    Match { key: K },
    Unmatch,
    Fixup { kind: InsertFixup, orientation: Orientation },
    BlackenRoot,
    Replace { target: K, with: K },
    Remove { key: K },
    FixupDelete { kind: DeleteFixup, orientation: Orientation },
}

impl<K: fmt::Display> fmt::Display for Step<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::SetAs(placement) => write!(f, "as {}", placement.name()),
            Step::Search { key, direction } => write!(f, "s {} {}", key, direction.arrow()),
            Step::Match { key } => write!(f, "match {}", key),
            Step::Unmatch => write!(f, "unmatch"),
            Step::Fixup { kind, orientation } => write!(f, "f {} {}", kind.name(), orientation),
            Step::BlackenRoot => write!(f, "f red-root"),
            Step::Replace { target, with } => write!(f, "replace {} with {}", target, with),
            Step::Remove { key } => write!(f, "remove {}", key),
            Step::FixupDelete { kind, orientation } => {
                write!(f, "fd {} {}", kind.name(), orientation)
            }
        }
    }
}

/// Recorder that buffers events in call order.
#[derive(Debug, Clone)]
pub struct QueueRecorder<K> {
    steps: VecDeque<Step<K>>,
}

impl<K> Default for QueueRecorder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> QueueRecorder<K> {
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
        }
    }

    pub fn reset(&mut self) {
        self.steps.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Pops the oldest recorded step.
    pub fn next_step(&mut self) -> Option<Step<K>> {
        self.steps.pop_front()
    }

    /// Steps not consumed yet, oldest first.
    pub fn left_steps(&self) -> impl Iterator<Item = &Step<K>> {
        self.steps.iter()
    }

    /// Takes every buffered step, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Step<K>> {
        self.steps.drain(..).collect()
    }

    fn push(&mut self, step: Step<K>) {
        self.steps.push_back(step);
    }
}

impl<K: Clone> StepRecorder<K> for QueueRecorder<K> {
    fn init_tree(&mut self) {
        self.push(Step::SetAs(Placement::Root));
    }

    fn search_node(&mut self, key: &K, direction: Direction, finished: bool) {
        self.push(Step::Search {
            key: key.clone(),
            direction,
        });
        if finished {
            self.push(Step::SetAs(Placement::Leaf));
        }
    }

    fn match_node(&mut self, key: &K) {
        self.push(Step::Match { key: key.clone() });
    }

    fn unmatch_node(&mut self) {
        self.push(Step::Unmatch);
    }

    fn fixup_tree(&mut self, kind: InsertFixup, orientation: Orientation) {
        self.push(Step::Fixup { kind, orientation });
    }

    fn blacken_root(&mut self) {
        self.push(Step::BlackenRoot);
    }

    fn replace_node(&mut self, target: &K, with: &K) {
        self.push(Step::Replace {
            target: target.clone(),
            with: with.clone(),
        });
    }

    fn remove_node(&mut self, key: &K) {
        self.push(Step::Remove { key: key.clone() });
    }

    fn fixup_delete(&mut self, kind: DeleteFixup, orientation: Orientation) {
        self.push(Step::FixupDelete { kind, orientation });
    }
}

/// Whether a tree carries a recorder, and whether it is currently listening.
#[derive(Debug, Clone)]
pub enum Recording<R> {
    Absent,
    Attached { recorder: R, enabled: bool },
}

impl<R> Recording<R> {
    pub fn attached(recorder: R) -> Self {
        Recording::Attached {
            recorder,
            enabled: false,
        }
    }

    /// Returns false when no recorder is attached.
    pub(crate) fn open(&mut self) -> bool {
        match self {
            Recording::Absent => false,
            Recording::Attached { enabled, .. } => {
                *enabled = true;
                true
            }
        }
    }

    pub(crate) fn close(&mut self) {
        if let Recording::Attached { enabled, .. } = self {
            *enabled = false;
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Recording::Attached { enabled: true, .. })
    }

    pub fn recorder(&self) -> Option<&R> {
        match self {
            Recording::Absent => None,
            Recording::Attached { recorder, .. } => Some(recorder),
        }
    }

    pub fn recorder_mut(&mut self) -> Option<&mut R> {
        match self {
            Recording::Absent => None,
            Recording::Attached { recorder, .. } => Some(recorder),
        }
    }

    /// Runs `event` against the recorder only while recording is open.
    #[inline]
    pub(crate) fn emit(&mut self, event: impl FnOnce(&mut R)) {
        if let Recording::Attached {
            recorder,
            enabled: true,
        } = self
        {
            event(recorder);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut recorder: QueueRecorder<u32> = QueueRecorder::new();
        recorder.init_tree();
        recorder.search_node(&1000, Direction::Left, true);
        recorder.unmatch_node();

        assert_eq!(recorder.len(), 4);
        assert_eq!(recorder.next_step(), Some(Step::SetAs(Placement::Root)));
        assert_eq!(
            recorder.next_step(),
            Some(Step::Search {
                key: 1000,
                direction: Direction::Left
            })
        );
        assert_eq!(recorder.next_step(), Some(Step::SetAs(Placement::Leaf)));
        let left: Vec<_> = recorder.left_steps().cloned().collect();
        assert_eq!(left, vec![Step::Unmatch]);
        assert_eq!(recorder.next_step(), Some(Step::Unmatch));
        assert!(recorder.is_empty());
        assert_eq!(recorder.next_step(), None);
    }

    #[test]
    fn test_reset_clears_queue() {
        let mut recorder: QueueRecorder<u32> = QueueRecorder::new();
        recorder.match_node(&7);
        recorder.blacken_root();
        recorder.reset();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_step_display_uses_fixture_notation() {
        let lr = Orientation::new(Direction::Left, Direction::Right);
        let steps: Vec<Step<u32>> = vec![
            Step::SetAs(Placement::Leaf),
            Step::Search {
                key: 380,
                direction: Direction::Right,
            },
            Step::Match { key: 400 },
            Step::Unmatch,
            Step::Fixup {
                kind: InsertFixup::BlackUncle,
                orientation: lr,
            },
            Step::BlackenRoot,
            Step::Replace {
                target: 1000,
                with: 750,
            },
            Step::Remove { key: 750 },
            Step::FixupDelete {
                kind: DeleteFixup::BlackNephews,
                orientation: lr,
            },
        ];
        let text: Vec<String> = steps.iter().map(ToString::to_string).collect();
        assert_eq!(
            text,
            vec![
                "as leaf",
                "s 380 ->",
                "match 400",
                "unmatch",
                "f black-uncle LR",
                "f red-root",
                "replace 1000 with 750",
                "remove 750",
                "fd black-nephews LR",
            ]
        );
    }

    #[test]
    fn test_recording_emits_only_when_enabled() {
        let mut recording = Recording::attached(QueueRecorder::<u32>::new());
        recording.emit(|r| r.unmatch_node());
        assert_eq!(recording.recorder().map(QueueRecorder::len), Some(0));

        assert!(recording.open());
        recording.emit(|r| r.unmatch_node());
        assert_eq!(recording.recorder().map(QueueRecorder::len), Some(1));

        recording.close();
        recording.emit(|r| r.unmatch_node());
        assert_eq!(recording.recorder().map(QueueRecorder::len), Some(1));
    }

    #[test]
    fn test_absent_recording_refuses_to_open() {
        let mut recording: Recording<NoopRecorder> = Recording::Absent;
        assert!(!recording.open());
        assert!(!recording.is_enabled());
    }
}
