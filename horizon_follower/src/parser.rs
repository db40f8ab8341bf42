//! Line parser for fixture files.
//!
//! A fixture is a YAML-like list of actions, each followed by its expected
//! steps indented one level deeper:
//!
//! ```text
//! - + 500:
//!   - s 1000 <-
//!   - as leaf
//! - / 450: ~
//! ```
//!
//! `: ~` leaves an action unchecked and `: []` expects no step at all.

use crate::behavior::{Action, ActionKind, Expectation, parse_key, parse_step};
use crate::error::{FollowerError, FollowerResult};

enum Item<'a> {
    Action {
        action: Action,
        indent: usize,
        takes_steps: bool,
    },
    Step(&'a str, usize),
}

/// Parses a whole fixture into its actions.
pub fn parse(source: &str) -> FollowerResult<Vec<Action>> {
    let mut actions: Vec<Action> = Vec::new();
    // Indentation of the current action, and whether it accepts steps
    let mut open: Option<(usize, bool)> = None;

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let Some(item) = read_item(raw, line)? else {
            continue;
        };

        match item {
            Item::Action {
                action,
                indent,
                takes_steps,
            } => {
                open = Some((indent, takes_steps));
                actions.push(action);
            }
            Item::Step(text, indent) => {
                let Some((action_indent, accepts)) = open else {
                    return Err(FollowerError::syntax(line, "step before any action"));
                };
                if indent <= action_indent {
                    return Err(FollowerError::syntax(
                        line,
                        "step must be indented under its action",
                    ));
                }
                if !accepts {
                    return Err(FollowerError::syntax(
                        line,
                        "action marked `~` or `[]` takes no steps",
                    ));
                }
                let step = parse_step(text).map_err(|reason| FollowerError::syntax(line, reason))?;
                if let Some(Action {
                    expectation: Expectation::Checked(steps),
                    ..
                }) = actions.last_mut()
                {
                    steps.push(step);
                }
            }
        }
    }

    tracing::debug!(actions = actions.len(), "parsed fixture");
    Ok(actions)
}

fn read_item(raw: &str, line: usize) -> FollowerResult<Option<Item<'_>>> {
    let body = raw.trim_start();
    if body.is_empty() || body.starts_with('#') {
        return Ok(None);
    }
    let indent = raw.len() - body.len();
    let Some(rest) = body.strip_prefix("- ") else {
        return Err(FollowerError::syntax(line, "expected a `- ` list item"));
    };
    let rest = rest.trim();

    let (head, unchecked, takes_steps) = if let Some(head) = rest.strip_suffix(": ~") {
        (head, true, false)
    } else if let Some(head) = rest.strip_suffix(": []") {
        (head, false, false)
    } else if let Some(head) = rest.strip_suffix(':') {
        (head, false, true)
    } else {
        return Ok(Some(Item::Step(rest, indent)));
    };

    let action = parse_action(head, line)?;
    Ok(Some(Item::Action {
        action: if unchecked { action.unchecked() } else { action },
        indent,
        takes_steps,
    }))
}

fn parse_action(head: &str, line: usize) -> FollowerResult<Action> {
    let mut words = head.split_whitespace();
    let (Some(token), Some(key), None) = (words.next(), words.next(), words.next()) else {
        return Err(FollowerError::syntax(
            line,
            format!("expected `<action> <key>`, found `{head}`"),
        ));
    };
    let Some(kind) = ActionKind::from_token(token) else {
        return Err(FollowerError::syntax(
            line,
            format!("unknown action `{token}`"),
        ));
    };
    let key = parse_key(key).map_err(|reason| FollowerError::syntax(line, reason))?;
    Ok(Action::new(kind, key, line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_rbtree::{Direction, Placement, Step};

    #[test]
    fn test_parse_actions_and_steps() {
        let source = "\
# two actions
- + 1000:
  - as root

- - 1000:
  - match 1000
  - remove 1000
";
        let actions = parse(source).expect("valid fixture");
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].kind, ActionKind::Insert);
        assert_eq!(actions[0].line, 2);
        assert_eq!(actions[0].steps(), &[Step::SetAs(Placement::Root)]);
        assert_eq!(actions[1].kind, ActionKind::Delete);
        assert_eq!(actions[1].key, 1000);
        assert_eq!(actions[1].steps().len(), 2);
    }

    #[test]
    fn test_long_forms_and_markers() {
        let source = "\
- insert 5: ~
- search 5: []
- delete 6:
    - s 5 ->
    - unmatch
";
        let actions = parse(source).expect("valid fixture");
        assert_eq!(actions[0].expectation, Expectation::Unchecked);
        assert_eq!(actions[1].expectation, Expectation::Checked(Vec::new()));
        assert_eq!(
            actions[2].steps(),
            &[
                Step::Search {
                    key: 5,
                    direction: Direction::Right
                },
                Step::Unmatch
            ]
        );
    }

    fn syntax_line(source: &str) -> usize {
        match parse(source) {
            Err(FollowerError::Syntax { line, .. }) => line,
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_syntax_errors_carry_line() {
        assert_eq!(syntax_line("  - as root\n"), 1);
        assert_eq!(syntax_line("- + 1:\n- as root\n"), 2);
        assert_eq!(syntax_line("- + 1: ~\n  - as root\n"), 2);
        assert_eq!(syntax_line("- + 1: []\n  - as root\n"), 2);
        assert_eq!(syntax_line("\n\n- * 1:\n"), 3);
        assert_eq!(syntax_line("- + one:\n"), 1);
        assert_eq!(syntax_line("- + 1 2:\n"), 1);
        assert_eq!(syntax_line("- + 1:\n  - s 1 <=\n"), 2);
        assert_eq!(syntax_line("+ 1:\n"), 1);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(parse("").expect("empty is fine"), Vec::new());
        assert_eq!(parse("# only a comment\n\n").expect("comments only").len(), 0);
    }
}
