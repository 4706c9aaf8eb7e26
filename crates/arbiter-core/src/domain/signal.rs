//! Control transfer between a routine and the evaluator.
//!
//! Primitives never unwind. A finalizing primitive returns `Err(Interrupt::Decided)`
//! and the routine hands it back with `?` or as its tail expression; the evaluator's
//! driving loop inspects it.

use std::convert::Infallible;

use super::failure::Fault;

/// Why a routine stopped running.
#[derive(Debug)]
pub enum Interrupt<E> {
    /// A finalizing primitive ran; read the staged verdict.
    Decided,
    /// Something failed and should go through handler lookup.
    Failed(Fault<E>),
}

impl<E> Interrupt<E> {
    pub fn is_decided(&self) -> bool {
        matches!(self, Interrupt::Decided)
    }
}

/// Lets routines raise with `Err(e)?` or `fallible()?`.
impl<E> From<E> for Interrupt<E> {
    fn from(e: E) -> Self {
        Interrupt::Failed(Fault::Raised(e))
    }
}

/// Result of a primitive that may return normally (`accept_if`, `reject_if`).
pub type Step<E> = Result<(), Interrupt<E>>;

/// Result of a primitive, routine or handler that never returns normally.
///
/// The `Ok` side is uninhabited, so every routine must end by finalizing or failing.
pub type Flow<E> = Result<Infallible, Interrupt<E>>;
