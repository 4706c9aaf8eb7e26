//! Domain model (verdicts, failures, control signals, errors).

pub mod errors;
pub mod failure;
pub mod signal;
pub mod verdict;

pub use self::errors::{ConfigError, DecisionError};
pub use self::failure::{Failure, Fault, FaultKind};
pub use self::signal::{Flow, Interrupt, Step};
pub use self::verdict::Verdict;
