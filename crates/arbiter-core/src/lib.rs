//! arbiter-core
//!
//! A structured Accept/Reject decision evaluator.
//!
//! A caller writes a decision routine against a [`Decision`] context. The routine ends
//! by finalizing (`accept`, `reject`, `decide`, ...) or by failing; failures are
//! matched by kind against recovery handlers the routine registered along the way,
//! and a handler runs as a fresh attempt that may decide, or fail again. The
//! [`Evaluator`] drives this to a result under an attempt ceiling.
//!
//! # Modules
//! - **domain**: verdict, failure kinds, control signals, errors
//! - **runtime**: `Decision` context, `HandlerTable`, `Evaluator`
//! - **filter**: sequence filtering through per-element decisions
//! - **candidates**: builder-target selection over scanned declarations
//!
//! ```ignore
//! use std::convert::Infallible;
//! use arbiter_core::{Decision, decide};
//!
//! let adult = decide(|ctx: &mut Decision<'_, Infallible>| {
//!     ctx.reject_if(|| age < 0)?;
//!     ctx.decide_on(|| age >= 18)
//! })?;
//! ```

pub mod candidates;
pub mod domain;
pub mod filter;
pub mod runtime;

pub use candidates::{
    Declaration, DeclarationKind, Modifier, RejectReason, Rejection, select_builder_targets,
};
pub use domain::{
    ConfigError, DecisionError, Failure, Fault, FaultKind, Flow, Interrupt, Step, Verdict,
};
pub use filter::{DecisionFilter, filter_decision};
pub use runtime::{
    DEFAULT_MAX_ATTEMPTS, Decision, Evaluator, EvaluatorConfig, HandlerTable, decide, make_decision,
};
