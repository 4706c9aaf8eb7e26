//! Failure kinds - how caller failures are keyed in the handler table.

use std::convert::Infallible;
use std::fmt::Debug;
use std::hash::Hash;

/// A failure type that routines may raise.
///
/// Recovery handlers are registered per `Kind` and matched by equality only; there is
/// no hierarchy. For an error enum the kind is usually a fieldless mirror of its
/// variants.
///
/// ```ignore
/// #[derive(Debug)]
/// enum LookupError { Missing(String), Stale { age: u64 } }
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum LookupErrorKind { Missing, Stale }
///
/// impl Failure for LookupError {
///     type Kind = LookupErrorKind;
///     fn kind(&self) -> LookupErrorKind {
///         match self {
///             LookupError::Missing(_) => LookupErrorKind::Missing,
///             LookupError::Stale { .. } => LookupErrorKind::Stale,
///         }
///     }
/// }
/// ```
pub trait Failure {
    type Kind: Eq + Hash + Clone + Debug;

    fn kind(&self) -> Self::Kind;
}

/// Routines that never raise their own failures.
impl Failure for Infallible {
    type Kind = Infallible;

    fn kind(&self) -> Infallible {
        match *self {}
    }
}

/// A failure travelling through the recovery pipeline.
#[derive(Debug)]
pub enum Fault<E> {
    /// Finalization was reached with nothing staged.
    Undefined,
    /// Raised by routine, side effect or handler code.
    Raised(E),
}

/// The key a [`Fault`] is dispatched under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FaultKind<K> {
    Undefined,
    Raised(K),
}

impl<E: Failure> Fault<E> {
    pub fn kind(&self) -> FaultKind<E::Kind> {
        match self {
            Fault::Undefined => FaultKind::Undefined,
            Fault::Raised(e) => FaultKind::Raised(e.kind()),
        }
    }
}
