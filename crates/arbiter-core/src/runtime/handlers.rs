//! HandlerTable - recovery handlers keyed by failure kind.
//!
//! Registration is last-wins: installing a handler for a kind that already has one
//! replaces it. Nothing is scoped; a handler stays installed for the rest of the
//! owning `Decision`'s life, across every re-entry.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::context::Decision;
use crate::domain::{Failure, Fault, FaultKind, Flow};

/// Handler for a caller failure of one kind. Receives the failure by value.
pub type RaisedHandler<'h, E> = Rc<dyn Fn(&mut Decision<'h, E>, E) -> Flow<E> + 'h>;

/// Handler for the DecisionUndefined fault.
pub type UndefinedHandler<'h, E> = Rc<dyn Fn(&mut Decision<'h, E>) -> Flow<E> + 'h>;

pub struct HandlerTable<'h, E: Failure> {
    raised: HashMap<E::Kind, RaisedHandler<'h, E>>,
    undefined: Option<UndefinedHandler<'h, E>>,
}

/// A handler matched to the fault it will receive, detached from the table so it can
/// run against the same `Decision` that owns the table.
pub(crate) enum Recovery<'h, E: Failure> {
    Undefined(UndefinedHandler<'h, E>),
    Raised(RaisedHandler<'h, E>, E),
}

impl<'h, E: Failure> Recovery<'h, E> {
    pub(crate) fn run(self, ctx: &mut Decision<'h, E>) -> Flow<E> {
        match self {
            Recovery::Undefined(handler) => handler(ctx),
            Recovery::Raised(handler, failure) => handler(ctx, failure),
        }
    }
}

impl<'h, E: Failure> HandlerTable<'h, E> {
    pub fn new() -> Self {
        Self {
            raised: HashMap::new(),
            undefined: None,
        }
    }

    /// Install the handler for `kind`. Returns `true` when it replaced an earlier one.
    pub fn insert_raised(&mut self, kind: E::Kind, handler: RaisedHandler<'h, E>) -> bool {
        self.raised.insert(kind, handler).is_some()
    }

    /// Install the DecisionUndefined handler. Returns `true` when it replaced an earlier one.
    pub fn insert_undefined(&mut self, handler: UndefinedHandler<'h, E>) -> bool {
        self.undefined.replace(handler).is_some()
    }

    pub fn handles(&self, kind: &FaultKind<E::Kind>) -> bool {
        match kind {
            FaultKind::Undefined => self.undefined.is_some(),
            FaultKind::Raised(kind) => self.raised.contains_key(kind),
        }
    }

    pub fn len(&self) -> usize {
        self.raised.len() + usize::from(self.undefined.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact-kind lookup. Hands the fault back when nothing is registered for it.
    pub(crate) fn recovery_for(&self, fault: Fault<E>) -> Result<Recovery<'h, E>, Fault<E>> {
        match fault {
            Fault::Undefined => match &self.undefined {
                Some(handler) => Ok(Recovery::Undefined(Rc::clone(handler))),
                None => Err(Fault::Undefined),
            },
            Fault::Raised(failure) => match self.raised.get(&failure.kind()) {
                Some(handler) => Ok(Recovery::Raised(Rc::clone(handler), failure)),
                None => Err(Fault::Raised(failure)),
            },
        }
    }
}

impl<E: Failure> Default for HandlerTable<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Failure> fmt::Debug for HandlerTable<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("raised", &self.raised.keys().collect::<Vec<_>>())
            .field("undefined", &self.undefined.is_some())
            .finish()
    }
}
