use horizon_rbtree::{InvariantViolation, Step, TreeError};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or following a fixture.
#[derive(Debug, Error)]
pub enum FollowerError {
    /// The fixture text is malformed.
    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    #[error(transparent)]
    Mismatch(#[from] VerificationMismatch),

    /// The tree broke an invariant after `action` ran.
    #[error("after {action}: {violation}")]
    Invariant {
        action: String,
        violation: InvariantViolation<i64>,
    },

    /// The tree refused an operation.
    #[error(transparent)]
    Tree(#[from] TreeError<i64>),

    #[error("failed to read fixture {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FollowerError {
    pub(crate) fn syntax(line: usize, reason: impl Into<String>) -> Self {
        FollowerError::Syntax {
            line,
            reason: reason.into(),
        }
    }
}

pub type FollowerResult<T> = Result<T, FollowerError>;

/// The recorded steps of one action disagree with its expected steps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{action}: {kind}")]
pub struct VerificationMismatch {
    /// Prose description of the action, e.g. `insert value 390`.
    pub action: String,
    pub kind: MismatchKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchKind {
    /// The tree took a different step than expected.
    WrongStep {
        expected: Step<i64>,
        actual: Step<i64>,
    },
    /// The tree stopped recording before this expected step.
    MissingStep { expected: Step<i64> },
    /// The tree recorded more steps than the action lists.
    LeftoverSteps { leftover: Vec<Step<i64>> },
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchKind::WrongStep { expected, actual } => {
                write!(f, "expected `{expected}`, got `{actual}`")
            }
            MismatchKind::MissingStep { expected } => {
                write!(f, "expected `{expected}` but no more steps were recorded")
            }
            MismatchKind::LeftoverSteps { leftover } => {
                write!(f, "{} more steps than expected:", leftover.len())?;
                for step in leftover {
                    write!(f, " `{step}`")?;
                }
                Ok(())
            }
        }
    }
}
