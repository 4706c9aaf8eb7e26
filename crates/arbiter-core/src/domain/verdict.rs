//! Verdict model: the tri-state outcome a decision routine stages.

use serde::{Deserialize, Serialize};

/// The outcome register of one evaluation.
///
/// Starts as `Undefined`. `accept`/`reject` and `set_accept`/`set_reject` move it to
/// `Accept` or `Reject`; reaching finalization while still `Undefined` is reported as
/// a DecisionUndefined fault.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Accept,
    Reject,
    #[default]
    Undefined,
}

impl Verdict {
    pub fn is_decided(self) -> bool {
        !matches!(self, Verdict::Undefined)
    }

    /// `Some(true)` for Accept, `Some(false)` for Reject.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Verdict::Accept => Some(true),
            Verdict::Reject => Some(false),
            Verdict::Undefined => None,
        }
    }
}

impl From<bool> for Verdict {
    fn from(accept: bool) -> Self {
        if accept {
            Verdict::Accept
        } else {
            Verdict::Reject
        }
    }
}
