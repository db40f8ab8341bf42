use crate::behavior::{Action, ActionKind, Expectation, describe_step};
use crate::error::{FollowerError, FollowerResult, MismatchKind, VerificationMismatch};
use crate::parser::parse;
use horizon_rbtree::{QueueRecorder, SteppedTree, TreeError};
use std::fs;
use std::path::Path;

/// Counts gathered by a successful [`Follower::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub actions: usize,
    /// Expected steps matched against the recorder.
    pub steps: usize,
    /// Actions whose steps were discarded.
    pub unchecked: usize,
}

/// Replays fixture actions against a tree and checks every recorded step.
pub struct Follower<'t, V> {
    tree: &'t mut SteppedTree<i64, V>,
    actions: Vec<Action>,
    check_invariants: bool,
}

impl<'t, V: Default> Follower<'t, V> {
    /// Parses `source` and opens recording on `tree`.
    pub fn new(source: &str, tree: &'t mut SteppedTree<i64, V>) -> FollowerResult<Self> {
        let actions = parse(source)?;
        Self::from_actions(actions, tree)
    }

    pub fn from_actions(
        actions: Vec<Action>,
        tree: &'t mut SteppedTree<i64, V>,
    ) -> FollowerResult<Self> {
        tree.open_recording()?;
        Ok(Self {
            tree,
            actions,
            check_invariants: true,
        })
    }

    /// Re-validate the tree after each action. On by default.
    pub fn check_invariants(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Every action followed by its steps in prose, one per line.
    pub fn description(&self) -> String {
        describe(&self.actions)
    }

    /// Runs all actions in order, stopping at the first failure.
    pub fn run(&mut self) -> FollowerResult<RunSummary> {
        let mut summary = RunSummary::default();
        for index in 0..self.actions.len() {
            match self.run_action(index) {
                Ok(Some(steps)) => summary.steps += steps,
                Ok(None) => summary.unchecked += 1,
                Err(err) => {
                    tracing::warn!(line = self.actions[index].line, "{err}");
                    return Err(err);
                }
            }
            summary.actions += 1;
        }
        Ok(summary)
    }

    fn run_action(&mut self, index: usize) -> FollowerResult<Option<usize>> {
        let action = &self.actions[index];
        tracing::debug!("* Action: {}", action.description());

        Self::apply(self.tree, action)?;
        let matched = Self::follow(self.tree, action)?;
        if self.check_invariants {
            self.tree
                .validate()
                .map_err(|violation| FollowerError::Invariant {
                    action: action.description(),
                    violation,
                })?;
        }
        Ok(matched)
    }

    fn apply(tree: &mut SteppedTree<i64, V>, action: &Action) -> FollowerResult<()> {
        Self::recorder(tree)?.reset();
        match action.kind {
            ActionKind::Insert => {
                tree.insert(action.key, V::default())?;
            }
            ActionKind::Search => {
                tree.search(&action.key);
            }
            ActionKind::Delete => {
                tree.delete(&action.key);
            }
        }
        Ok(())
    }

    /// Compares recorded steps with the expected ones. Returns how many were
    /// matched, or `None` for an unchecked action.
    fn follow(tree: &mut SteppedTree<i64, V>, action: &Action) -> FollowerResult<Option<usize>> {
        let recorder = Self::recorder(tree)?;
        let expected = match &action.expectation {
            Expectation::Checked(steps) => steps,
            Expectation::Unchecked => {
                recorder.reset();
                return Ok(None);
            }
        };

        let mismatch = |kind| VerificationMismatch {
            action: action.description(),
            kind,
        };
        for step in expected {
            let Some(actual) = recorder.next_step() else {
                return Err(mismatch(MismatchKind::MissingStep {
                    expected: step.clone(),
                })
                .into());
            };
            if &actual != step {
                return Err(mismatch(MismatchKind::WrongStep {
                    expected: step.clone(),
                    actual,
                })
                .into());
            }
            tracing::debug!("  - Step: {}", describe_step(step));
        }

        if !recorder.is_empty() {
            let leftover = recorder.drain();
            return Err(mismatch(MismatchKind::LeftoverSteps { leftover }).into());
        }
        Ok(Some(expected.len()))
    }

    fn recorder(tree: &mut SteppedTree<i64, V>) -> FollowerResult<&mut QueueRecorder<i64>> {
        tree.recorder_mut()
            .ok_or(FollowerError::Tree(TreeError::RecordingMisuse))
    }
}

/// Prose description of parsed actions, as printed by [`Follower::description`].
pub fn describe(actions: &[Action]) -> String {
    let mut lines = Vec::new();
    for action in actions {
        lines.push(action.description());
        match &action.expectation {
            Expectation::Checked(steps) => lines.extend(steps.iter().map(describe_step)),
            Expectation::Unchecked => lines.push("Steps are not checked".to_string()),
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Reads and parses a fixture file.
pub fn load_file(path: impl AsRef<Path>) -> FollowerResult<Vec<Action>> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| FollowerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded fixture");
    parse(&source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_rbtree::{RBTree, TreeConfig};

    fn tree() -> SteppedTree<i64, ()> {
        RBTree::with_recorder(TreeConfig::default(), QueueRecorder::new())
    }

    #[test]
    fn test_run_counts_steps() {
        let mut tree = tree();
        let source = "- + 10:\n  - as root\n- + 5: ~\n- / 5:\n  - s 10 <-\n  - match 5\n";
        let mut follower = Follower::new(source, &mut tree).expect("valid fixture");
        let summary = follower.run().expect("fixture holds");
        assert_eq!(
            summary,
            RunSummary {
                actions: 3,
                steps: 3,
                unchecked: 1
            }
        );
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_empty_expectation_rejects_any_step() {
        let mut tree = tree();
        let mut follower = Follower::new("- + 10: []\n", &mut tree).expect("valid fixture");
        match follower.run() {
            Err(FollowerError::Mismatch(mismatch)) => {
                assert_eq!(mismatch.action, "insert value 10");
                assert!(matches!(mismatch.kind, MismatchKind::LeftoverSteps { .. }));
            }
            other => panic!("expected leftover steps, got {other:?}"),
        }
    }

    #[test]
    fn test_description_lists_steps() {
        let mut tree = tree();
        let follower =
            Follower::new("- + 10:\n  - as root\n- - 3: ~\n", &mut tree).expect("valid fixture");
        assert_eq!(
            follower.description(),
            "insert value 10\nSet value as root\n\ndelete value 3\nSteps are not checked\n"
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_file("/nonexistent/horizon/fixture.yml").expect_err("no such file");
        assert!(matches!(err, FollowerError::Io { .. }));
    }
}
