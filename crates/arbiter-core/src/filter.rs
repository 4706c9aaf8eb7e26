//! Sequence filter: keep the elements a decision routine accepts.
//!
//! Every element gets its own boolean evaluation with a fresh `Decision`, so handlers
//! registered for one element never leak into the next. Order is preserved. The first
//! unhandled failure aborts the whole filter; there is no partial result.

use crate::domain::{DecisionError, Failure, Flow};
use crate::runtime::{Decision, Evaluator};

impl Evaluator {
    pub fn filter<'h, I, E, F>(
        &self,
        items: I,
        mut routine: F,
    ) -> Result<Vec<I::Item>, DecisionError<E>>
    where
        I: IntoIterator,
        E: Failure + 'h,
        F: FnMut(&mut Decision<'h, E>, &I::Item) -> Flow<E>,
    {
        let mut kept = Vec::new();
        for item in items {
            if self.decide(|ctx| routine(ctx, &item))? {
                kept.push(item);
            }
        }
        Ok(kept)
    }
}

/// Iterator adapter form of [`filter_decision`].
///
/// ```ignore
/// let even = (1..=4).filter_decision(|ctx: &mut Decision<'_, Infallible>, n| {
///     ctx.accept_if(|| n % 2 == 0)?;
///     ctx.reject()
/// })?;
/// assert_eq!(even, vec![2, 4]);
/// ```
pub trait DecisionFilter: Iterator + Sized {
    fn filter_decision<'h, E, F>(self, routine: F) -> Result<Vec<Self::Item>, DecisionError<E>>
    where
        E: Failure + 'h,
        F: FnMut(&mut Decision<'h, E>, &Self::Item) -> Flow<E>,
    {
        Evaluator::default().filter(self, routine)
    }
}

impl<I: Iterator> DecisionFilter for I {}

/// Filter `items` with the default evaluator.
pub fn filter_decision<'h, I, E, F>(items: I, routine: F) -> Result<Vec<I::Item>, DecisionError<E>>
where
    I: IntoIterator,
    E: Failure + 'h,
    F: FnMut(&mut Decision<'h, E>, &I::Item) -> Flow<E>,
{
    Evaluator::default().filter(items, routine)
}
