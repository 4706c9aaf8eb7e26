use thiserror::Error;

use super::failure::Fault;

/// Every way an evaluation can end without producing a result.
#[derive(Debug, Error)]
pub enum DecisionError<E> {
    /// Finalized with nothing staged and no handler for it.
    #[error("decision finalized while undefined")]
    Undefined,

    /// The recovery pipeline exceeded its attempt ceiling.
    #[error("too many re-entries: exceeded {limit} attempts")]
    TooManyReentries { limit: u32 },

    /// A caller failure with no registered handler, passed through unchanged.
    #[error("unhandled failure: {0}")]
    Raised(E),
}

impl<E> DecisionError<E> {
    /// The caller's own failure, if that is what ended the evaluation.
    pub fn into_raised(self) -> Option<E> {
        match self {
            DecisionError::Raised(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> From<Fault<E>> for DecisionError<E> {
    fn from(fault: Fault<E>) -> Self {
        match fault {
            Fault::Undefined => DecisionError::Undefined,
            Fault::Raised(e) => DecisionError::Raised(e),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
}
