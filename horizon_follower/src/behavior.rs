//! Actions and expected steps read from a fixture.

use horizon_rbtree::{DeleteFixup, Direction, InsertFixup, Orientation, Placement, Step};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Insert,
    Search,
    Delete,
}

impl ActionKind {
    /// Accepts the symbol (`+`, `/`, `-`) or the long form.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "+" | "insert" => Some(ActionKind::Insert),
            "/" | "search" => Some(ActionKind::Search),
            "-" | "delete" => Some(ActionKind::Delete),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Insert => "insert",
            ActionKind::Search => "search",
            ActionKind::Delete => "delete",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            ActionKind::Insert => '+',
            ActionKind::Search => '/',
            ActionKind::Delete => '-',
        }
    }
}

/// What the follower compares after an action ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// Exactly these steps, in order. Empty means no step at all.
    Checked(Vec<Step<i64>>),
    /// Whatever was recorded is discarded.
    Unchecked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub key: i64,
    pub expectation: Expectation,
    /// Line of the fixture the action was read from.
    pub line: usize,
}

impl Action {
    pub fn new(kind: ActionKind, key: i64, line: usize) -> Self {
        Self {
            kind,
            key,
            expectation: Expectation::Checked(Vec::new()),
            line,
        }
    }

    pub fn unchecked(mut self) -> Self {
        self.expectation = Expectation::Unchecked;
        self
    }

    pub fn steps(&self) -> &[Step<i64>] {
        match &self.expectation {
            Expectation::Checked(steps) => steps,
            Expectation::Unchecked => &[],
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self.expectation, Expectation::Checked(_))
    }

    pub fn description(&self) -> String {
        format!("{} value {}", self.kind.name(), self.key)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.symbol(), self.key)
    }
}

/// Parses the text of one step item, e.g. `s 1000 <-` or `fd black-sibling LR`.
pub fn parse_step(text: &str) -> Result<Step<i64>, String> {
    let mut words = text.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty step".to_string());
    };
    let args: Vec<&str> = words.collect();

    let step = match (head, args.as_slice()) {
        ("as", [placement]) => Step::SetAs(parse_placement(placement)?),
        ("s" | "search", [key, arrow]) => Step::Search {
            key: parse_key(key)?,
            direction: parse_arrow(arrow)?,
        },
        ("match" | "m", [key]) => Step::Match {
            key: parse_key(key)?,
        },
        ("unmatch" | "um", []) => Step::Unmatch,
        ("f" | "fixup", ["red-root"]) => Step::BlackenRoot,
        ("f" | "fixup", [kind, orientation]) => Step::Fixup {
            kind: parse_insert_fixup(kind)?,
            orientation: parse_orientation(orientation)?,
        },
        ("replace" | "r", [target, "with", with]) => Step::Replace {
            target: parse_key(target)?,
            with: parse_key(with)?,
        },
        ("remove" | "rm", [key]) => Step::Remove {
            key: parse_key(key)?,
        },
        ("fd", [kind, orientation]) => Step::FixupDelete {
            kind: parse_delete_fixup(kind)?,
            orientation: parse_orientation(orientation)?,
        },
        _ => return Err(format!("unknown step `{text}`")),
    };
    Ok(step)
}

pub(crate) fn parse_key(text: &str) -> Result<i64, String> {
    text.parse()
        .map_err(|_| format!("`{text}` is not an integer key"))
}

fn parse_placement(text: &str) -> Result<Placement, String> {
    match text {
        "root" => Ok(Placement::Root),
        "leaf" => Ok(Placement::Leaf),
        _ => Err(format!("a node is set as `root` or `leaf`, not `{text}`")),
    }
}

fn parse_arrow(text: &str) -> Result<Direction, String> {
    match text {
        "<-" => Ok(Direction::Left),
        "->" => Ok(Direction::Right),
        _ => Err(format!("expected `<-` or `->`, found `{text}`")),
    }
}

fn parse_orientation(text: &str) -> Result<Orientation, String> {
    Orientation::from_letters(text)
        .ok_or_else(|| format!("expected one of LL, LR, RL, RR, found `{text}`"))
}

fn parse_insert_fixup(text: &str) -> Result<InsertFixup, String> {
    match text {
        "red-uncle" => Ok(InsertFixup::RedUncle),
        "black-uncle" => Ok(InsertFixup::BlackUncle),
        _ => Err(format!("unknown insert fixup `{text}`")),
    }
}

fn parse_delete_fixup(text: &str) -> Result<DeleteFixup, String> {
    match text {
        "red-sibling" | "red-brother" => Ok(DeleteFixup::RedSibling),
        "black-nephews" => Ok(DeleteFixup::BlackNephews),
        "black-sibling" | "black-brother" => Ok(DeleteFixup::BlackSibling),
        _ => Err(format!("unknown delete fixup `{text}`")),
    }
}

/// One line of prose for a step.
pub fn describe_step(step: &Step<i64>) -> String {
    match step {
        Step::SetAs(placement) => format!("Set value as {}", placement.name()),
        Step::Search { key, direction } => {
            let side = match direction {
                Direction::Left => "left",
                Direction::Right => "right",
            };
            format!("Search under {side} branch of node {key}")
        }
        Step::Match { key } => format!("Match key {key}"),
        Step::Unmatch => "Unmatched".to_string(),
        Step::Fixup { kind, orientation } => {
            format!("Fixup tree, found {} with {orientation}", kind.name())
        }
        Step::BlackenRoot => "Fixup tree, found root node is red".to_string(),
        Step::Replace { target, with } => format!("Replace key {target} with {with}"),
        Step::Remove { key } => format!("Remove node that held {key}"),
        Step::FixupDelete { kind, orientation } => {
            format!("Fixup deletion, found {} with {orientation}", kind.name())
        }
    }
}
