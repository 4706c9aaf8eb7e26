//! Decision - the capability a routine receives.
//!
//! Primitives come in two shapes:
//! - conditional ones (`accept_if`, `reject_if`) return [`Step`]; `?` them and keep going.
//! - finalizing ones (`accept`, `reject`, `decide`, `decide_on`, `raise`) return [`Flow`],
//!   whose `Ok` side is uninhabited. Return them, or `?` them.
//!
//! ```ignore
//! evaluator.decide(|ctx: &mut Decision<'_, Infallible>| {
//!     ctx.reject_if(|| user.is_banned())?;
//!     ctx.accept_if(|| user.is_admin())?;
//!     ctx.decide_on(|| user.age >= 18)
//! })
//! ```
//!
//! A `Decision` holds `Rc` handlers, so it is neither `Send` nor `Sync`: one
//! evaluation, one thread of control.

use std::rc::Rc;

use tracing::{debug, warn};

use super::handlers::HandlerTable;
use crate::domain::{DecisionError, Failure, Flow, Interrupt, Step, Verdict};

/// Per-evaluation state: the staged verdict, the handler table and the attempt counter.
///
/// Created by the evaluator for exactly one `evaluate` call and never reused.
#[derive(Debug)]
pub struct Decision<'h, E: Failure> {
    verdict: Verdict,
    handlers: HandlerTable<'h, E>,
    attempts: u32,
}

impl<'h, E: Failure> Decision<'h, E> {
    pub(crate) fn new() -> Self {
        Self {
            verdict: Verdict::Undefined,
            handlers: HandlerTable::new(),
            attempts: 0,
        }
    }

    /// The currently staged verdict.
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Attempts made so far in this evaluation, counting the initial run.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn handlers(&self) -> &HandlerTable<'h, E> {
        &self.handlers
    }

    /// Accept if `predicate` holds, otherwise return normally.
    pub fn accept_if(&mut self, predicate: impl FnOnce() -> bool) -> Step<E> {
        if predicate() {
            return finalized(self.accept());
        }
        Ok(())
    }

    /// Like [`accept_if`](Self::accept_if), running `effect` before finalizing.
    pub fn accept_if_then(
        &mut self,
        predicate: impl FnOnce() -> bool,
        effect: impl FnOnce() -> Result<(), E>,
    ) -> Step<E> {
        if predicate() {
            return finalized(self.accept_then(effect));
        }
        Ok(())
    }

    /// Reject if `predicate` holds, otherwise return normally.
    pub fn reject_if(&mut self, predicate: impl FnOnce() -> bool) -> Step<E> {
        if predicate() {
            return finalized(self.reject());
        }
        Ok(())
    }

    pub fn reject_if_then(
        &mut self,
        predicate: impl FnOnce() -> bool,
        effect: impl FnOnce() -> Result<(), E>,
    ) -> Step<E> {
        if predicate() {
            return finalized(self.reject_then(effect));
        }
        Ok(())
    }

    /// Evaluate `predicate` once and finalize with its answer.
    pub fn decide_on(&mut self, predicate: impl FnOnce() -> bool) -> Flow<E> {
        if predicate() {
            self.accept()
        } else {
            self.reject()
        }
    }

    /// Like [`decide_on`](Self::decide_on), with a side effect for each branch.
    /// Only the effect of the chosen branch runs.
    pub fn decide_on_then(
        &mut self,
        predicate: impl FnOnce() -> bool,
        on_accept: impl FnOnce() -> Result<(), E>,
        on_reject: impl FnOnce() -> Result<(), E>,
    ) -> Flow<E> {
        if predicate() {
            self.accept_then(on_accept)
        } else {
            self.reject_then(on_reject)
        }
    }

    pub fn accept(&mut self) -> Flow<E> {
        self.finalize(Verdict::Accept, || Ok(()))
    }

    /// Stage Accept, run `effect`, then finalize.
    ///
    /// If `effect` fails, the failure is raised instead and the decision is not made;
    /// Accept stays staged for any later `decide`.
    pub fn accept_then(&mut self, effect: impl FnOnce() -> Result<(), E>) -> Flow<E> {
        self.finalize(Verdict::Accept, effect)
    }

    pub fn reject(&mut self) -> Flow<E> {
        self.finalize(Verdict::Reject, || Ok(()))
    }

    pub fn reject_then(&mut self, effect: impl FnOnce() -> Result<(), E>) -> Flow<E> {
        self.finalize(Verdict::Reject, effect)
    }

    /// Stage Accept without finalizing.
    pub fn set_accept(&mut self) {
        self.verdict = Verdict::Accept;
    }

    /// Stage Reject without finalizing.
    pub fn set_reject(&mut self) {
        self.verdict = Verdict::Reject;
    }

    /// Finalize with whatever is staged. Nothing staged becomes a DecisionUndefined
    /// fault, which goes through the handler table like any other failure.
    pub fn decide(&mut self) -> Flow<E> {
        Err(Interrupt::Decided)
    }

    pub fn raise(&self, failure: E) -> Flow<E> {
        Err(Interrupt::from(failure))
    }

    /// Install the recovery handler for failures of `kind`, replacing any earlier one.
    ///
    /// The handler stays active for the rest of this evaluation, including failures
    /// raised from inside other handlers.
    pub fn on_err(
        &mut self,
        kind: E::Kind,
        handler: impl Fn(&mut Decision<'h, E>, E) -> Flow<E> + 'h,
    ) {
        if self.handlers.insert_raised(kind.clone(), Rc::new(handler)) {
            debug!(?kind, "recovery handler replaced");
        }
    }

    /// Install the recovery handler for DecisionUndefined.
    pub fn on_undefined(&mut self, handler: impl Fn(&mut Decision<'h, E>) -> Flow<E> + 'h) {
        if self.handlers.insert_undefined(Rc::new(handler)) {
            debug!("undefined-decision handler replaced");
        }
    }

    /// Count one attempt against `limit`.
    pub(crate) fn enter(&mut self, limit: u32) -> Result<u32, DecisionError<E>> {
        if self.attempts >= limit {
            warn!(limit, "decision re-entry ceiling reached");
            return Err(DecisionError::TooManyReentries { limit });
        }
        self.attempts += 1;
        Ok(self.attempts)
    }

    fn finalize(&mut self, verdict: Verdict, effect: impl FnOnce() -> Result<(), E>) -> Flow<E> {
        self.verdict = verdict;
        effect()?;
        Err(Interrupt::Decided)
    }
}

fn finalized<E>(flow: Flow<E>) -> Step<E> {
    flow.map(|never| match never {})
}
