use horizon_follower::{
    ActionKind, Follower, FollowerError, MismatchKind, RunSummary, load_file,
};
use horizon_rbtree::{
    Direction, QueueRecorder, RBTree, SteppedTree, Step, TreeConfig, TreeError,
};
use std::path::PathBuf;

const INSERTION: &str = include_str!("fixtures/insertion.yml");

fn tree() -> SteppedTree<i64, ()> {
    RBTree::with_recorder(TreeConfig::default(), QueueRecorder::new())
}

/// Runs each fixture in turn against the same tree.
fn follow(tree: &mut SteppedTree<i64, ()>, sources: &[&str]) -> Result<RunSummary, FollowerError> {
    let mut total = RunSummary::default();
    for source in sources {
        let summary = Follower::new(source, tree)?.run()?;
        total.actions += summary.actions;
        total.steps += summary.steps;
        total.unchecked += summary.unchecked;
    }
    Ok(total)
}

fn mismatch_kind(result: Result<RunSummary, FollowerError>) -> MismatchKind {
    match result {
        Err(FollowerError::Mismatch(mismatch)) => mismatch.kind,
        other => panic!("expected a step mismatch, got {other:?}"),
    }
}

#[test]
fn test_insertion() {
    let mut tree = tree();
    let summary = follow(&mut tree, &[INSERTION]).expect("insertion fixture holds");
    assert_eq!(summary.actions, 16);
    assert_eq!(summary.unchecked, 0);
    assert_eq!(tree.len(), 16);
    assert!(tree.is_valid());
}

#[test]
fn test_allow_insert_duplicate_key() {
    let mut tree = tree();
    follow(
        &mut tree,
        &[INSERTION, include_str!("fixtures/insert_duplicate.yml")],
    )
    .expect("duplicate descends left");
    assert_eq!(tree.keys().filter(|&&key| key == 1250).count(), 2);
}

#[test]
fn test_disallow_insert_duplicate_key() {
    let mut tree = RBTree::with_recorder(
        TreeConfig::new().with_duplicate_keys(false),
        QueueRecorder::new(),
    );
    follow(&mut tree, &[INSERTION]).expect("insertion fixture holds");

    let mut follower = Follower::new(include_str!("fixtures/insert_duplicate.yml"), &mut tree)
        .expect("valid fixture");
    let dup_key = follower.actions().last().map(|action| action.key);
    match follower.run() {
        Err(FollowerError::Tree(err)) => {
            assert_eq!(err, TreeError::DuplicateKey(1250));
            assert_eq!(err.duplicate_key().copied(), dup_key);
        }
        other => panic!("expected a duplicate key error, got {other:?}"),
    }
    assert_eq!(tree.len(), 16);
}

#[test]
fn test_search_matched() {
    let mut tree = tree();
    follow(&mut tree, &[INSERTION, include_str!("fixtures/search_400.yml")])
        .expect("400 is found");
}

#[test]
fn test_search_unmatched() {
    let mut tree = tree();
    follow(&mut tree, &[INSERTION, include_str!("fixtures/search_450.yml")])
        .expect("450 is missing");
}

#[test]
fn test_delete_root() {
    let mut tree = tree();
    follow(&mut tree, &[INSERTION, include_str!("fixtures/delete_root.yml")])
        .expect("root deletion trace holds");
    assert!(!tree.contains_key(&1000));
}

#[test]
fn test_delete_leaves() {
    let mut tree = tree();
    follow(&mut tree, &[INSERTION, include_str!("fixtures/delete_leaves.yml")])
        .expect("leaf deletion traces hold");
    assert_eq!(tree.len(), 11);
}

#[test]
fn test_delete_red_child() {
    let mut tree = tree();
    follow(
        &mut tree,
        &[INSERTION, include_str!("fixtures/delete_red_child.yml")],
    )
    .expect("red child promotion traces hold");
}

#[test]
fn test_delete_cascade() {
    let mut tree = tree();
    follow(
        &mut tree,
        &[INSERTION, include_str!("fixtures/delete_cascade.yml")],
    )
    .expect("cascading fixup traces hold");
}

#[test]
fn test_delete_absent_key() {
    let mut tree = tree();
    follow(&mut tree, &[INSERTION, include_str!("fixtures/delete_absent.yml")])
        .expect("absent key traces hold");
    assert_eq!(tree.len(), 15);
}

#[test]
fn test_delete_red_sibling() {
    let mut tree = tree();
    let summary = follow(&mut tree, &[include_str!("fixtures/delete_red_sibling.yml")])
        .expect("red sibling trace holds");
    assert_eq!(summary.unchecked, 6);
    assert_eq!(
        tree.keys().copied().collect::<Vec<_>>(),
        vec![20, 60, 100, 130, 170]
    );
}

#[test]
fn test_delete_near_nephew() {
    let mut tree = tree();
    follow(&mut tree, &[include_str!("fixtures/delete_near_nephew.yml")])
        .expect("near nephew trace holds");
}

#[test]
fn test_delete_everything() {
    let mut tree = tree();
    follow(&mut tree, &[INSERTION, include_str!("fixtures/delete_all.yml")])
        .expect("every deletion trace holds");
    assert!(tree.is_empty());
}

#[test]
fn test_wrong_step_is_reported() {
    let mut tree = tree();
    let result = follow(&mut tree, &[INSERTION, "- / 400:\n  - s 1000 ->\n"]);
    assert_eq!(
        mismatch_kind(result),
        MismatchKind::WrongStep {
            expected: Step::Search {
                key: 1000,
                direction: Direction::Right
            },
            actual: Step::Search {
                key: 1000,
                direction: Direction::Left
            },
        }
    );
}

#[test]
fn test_missing_step_is_reported() {
    let mut tree = tree();
    let fixture = "\
- / 400:
  - s 1000 <-
  - s 380 ->
  - s 500 <-
  - match 400
  - unmatch
";
    let result = follow(&mut tree, &[INSERTION, fixture]);
    assert_eq!(
        mismatch_kind(result),
        MismatchKind::MissingStep {
            expected: Step::Unmatch
        }
    );
}

#[test]
fn test_leftover_steps_are_reported() {
    let mut tree = tree();
    let result = follow(&mut tree, &[INSERTION, "- / 400:\n  - s 1000 <-\n"]);
    match mismatch_kind(result) {
        MismatchKind::LeftoverSteps { leftover } => {
            assert_eq!(leftover.len(), 3);
            assert_eq!(leftover.last(), Some(&Step::Match { key: 400 }));
        }
        other => panic!("expected leftover steps, got {other:?}"),
    }
}

#[test]
fn test_failing_action_is_named() {
    let mut tree = tree();
    let result = follow(&mut tree, &[INSERTION, "- - 95:\n  - match 95\n"]);
    match result {
        Err(err) => assert!(err.to_string().starts_with("delete value 95: ")),
        Ok(summary) => panic!("unexpected success {summary:?}"),
    }
}

#[test]
fn test_load_fixture_files() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let actions = load_file(dir.join("delete_root.yml")).expect("fixture loads");
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].kind, ActionKind::Delete);
    assert_eq!(actions[0].steps().len(), 7);

    let insertion = load_file(dir.join("insertion.yml")).expect("fixture loads");
    assert!(insertion.iter().all(|action| action.kind == ActionKind::Insert));
}
