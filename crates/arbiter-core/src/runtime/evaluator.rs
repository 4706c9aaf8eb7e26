//! Evaluator - drives one decision routine to a result.
//!
//! The driving loop is iterative. Each pass counts one attempt against the ceiling,
//! then inspects how the last routine or handler stopped:
//! - `Decided` with a staged verdict ends the evaluation.
//! - `Decided` with nothing staged becomes a DecisionUndefined fault (one attempt).
//! - a fault with a registered handler runs that handler as the next attempt.
//! - a fault without one is returned to the caller unchanged.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::context::Decision;
use crate::domain::{ConfigError, DecisionError, Failure, Fault, Flow, Interrupt};

/// Attempt ceiling used when nothing else is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Routine and handler runs allowed in one evaluation, the initial run included.
    pub max_attempts: u32,
}

impl EvaluatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Run `routine` against a fresh [`Decision`] and map the verdict through
    /// `on_accept` / `on_reject`.
    ///
    /// # Errors
    /// - [`DecisionError::Undefined`] if finalized with nothing staged and unhandled.
    /// - [`DecisionError::TooManyReentries`] once the attempt ceiling is exceeded.
    /// - [`DecisionError::Raised`] for a caller failure with no handler.
    pub fn evaluate<'h, R, E, A, J, F>(
        &self,
        on_accept: A,
        on_reject: J,
        routine: F,
    ) -> Result<R, DecisionError<E>>
    where
        E: Failure + 'h,
        A: FnOnce() -> R,
        J: FnOnce() -> R,
        F: FnOnce(&mut Decision<'h, E>) -> Flow<E>,
    {
        let mut ctx = Decision::new();
        if self.drive(&mut ctx, routine)? {
            Ok(on_accept())
        } else {
            Ok(on_reject())
        }
    }

    /// Boolean form: Accept is `true`, Reject is `false`.
    pub fn decide<'h, E, F>(&self, routine: F) -> Result<bool, DecisionError<E>>
    where
        E: Failure + 'h,
        F: FnOnce(&mut Decision<'h, E>) -> Flow<E>,
    {
        self.evaluate(|| true, || false, routine)
    }

    fn drive<'h, E, F>(
        &self,
        ctx: &mut Decision<'h, E>,
        routine: F,
    ) -> Result<bool, DecisionError<E>>
    where
        E: Failure + 'h,
        F: FnOnce(&mut Decision<'h, E>) -> Flow<E>,
    {
        let limit = self.config.max_attempts;
        ctx.enter(limit)?;
        let mut flow = routine(ctx);

        loop {
            let fault = match flow {
                Ok(never) => match never {},
                Err(Interrupt::Decided) => match ctx.verdict().as_bool() {
                    Some(accepted) => {
                        debug!(accepted, attempts = ctx.attempts(), "decision finalized");
                        return Ok(accepted);
                    }
                    None => {
                        ctx.enter(limit)?;
                        Fault::Undefined
                    }
                },
                Err(Interrupt::Failed(fault)) => fault,
            };

            let kind = fault.kind();
            let recovery = match ctx.handlers().recovery_for(fault) {
                Ok(recovery) => recovery,
                Err(fault) => {
                    debug!(?kind, "no recovery handler; propagating");
                    return Err(fault.into());
                }
            };

            let attempt = ctx.enter(limit)?;
            debug!(?kind, attempt, "dispatching recovery handler");
            flow = recovery.run(ctx);
        }
    }
}

/// Generic form using the default evaluator.
pub fn make_decision<'h, R, E, A, J, F>(
    on_accept: A,
    on_reject: J,
    routine: F,
) -> Result<R, DecisionError<E>>
where
    E: Failure + 'h,
    A: FnOnce() -> R,
    J: FnOnce() -> R,
    F: FnOnce(&mut Decision<'h, E>) -> Flow<E>,
{
    Evaluator::default().evaluate(on_accept, on_reject, routine)
}

/// Boolean form using the default evaluator.
pub fn decide<'h, E, F>(routine: F) -> Result<bool, DecisionError<E>>
where
    E: Failure + 'h,
    F: FnOnce(&mut Decision<'h, E>) -> Flow<E>,
{
    Evaluator::default().decide(routine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Verdict;
    use crate::runtime::fixtures::{Oops, OopsKind};
    use rstest::rstest;
    use std::cell::Cell;
    use std::convert::Infallible;

    #[rstest]
    #[case::holds(true)]
    #[case::fails(false)]
    fn accept_if_alone_accepts_or_is_undefined(#[case] holds: bool) {
        let result = decide(|ctx: &mut Decision<'_, Infallible>| {
            ctx.accept_if(|| holds)?;
            ctx.decide()
        });

        if holds {
            assert!(result.unwrap());
        } else {
            assert!(matches!(result, Err(DecisionError::Undefined)));
        }
    }

    #[rstest]
    #[case::holds(true)]
    #[case::fails(false)]
    fn decide_on_always_finalizes(#[case] holds: bool) {
        let reached_tail = Cell::new(false);
        let result = decide(|ctx: &mut Decision<'_, Infallible>| {
            ctx.decide_on(|| holds)?;
            reached_tail.set(true);
            ctx.reject()
        });

        assert_eq!(result.unwrap(), holds);
        assert!(!reached_tail.get());
    }

    #[test]
    fn generic_form_maps_verdict_through_callbacks() {
        let result = make_decision(
            || "granted",
            || "denied",
            |ctx: &mut Decision<'_, Infallible>| ctx.reject(),
        );
        assert_eq!(result.unwrap(), "denied");
    }

    #[test]
    fn only_the_chosen_callback_runs() {
        let accepted = Cell::new(0);
        let rejected = Cell::new(0);
        let result = make_decision(
            || accepted.set(accepted.get() + 1),
            || rejected.set(rejected.get() + 1),
            |ctx: &mut Decision<'_, Infallible>| ctx.accept(),
        );

        assert!(result.is_ok());
        assert_eq!((accepted.get(), rejected.get()), (1, 0));
    }

    #[test]
    fn staged_verdict_is_used_by_decide() {
        let result = decide(|ctx: &mut Decision<'_, Infallible>| {
            ctx.set_reject();
            ctx.set_accept();
            ctx.decide()
        });
        assert!(result.unwrap());
    }

    #[test]
    fn decide_without_staging_goes_to_undefined_handler() {
        let result = decide(|ctx: &mut Decision<'_, Infallible>| {
            ctx.on_undefined(|ctx| ctx.reject());
            ctx.decide()
        });
        assert!(!result.unwrap());
    }

    #[test]
    fn unhandled_failure_propagates_unchanged() {
        let result = decide(|ctx: &mut Decision<'_, Oops>| {
            ctx.on_err(OopsKind::Parse, |ctx, _| ctx.accept());
            Err::<(), _>(Oops::Network("timeout"))?;
            ctx.accept()
        });

        let err = result.unwrap_err();
        assert!(matches!(err.into_raised(), Some(Oops::Network("timeout"))));
    }

    #[test]
    fn handler_receives_the_failure() {
        let seen = Cell::new(0);
        let result = decide::<Oops, _>(|ctx| {
            ctx.on_err(OopsKind::Parse, |ctx, failure| {
                if let Oops::Parse(line) = failure {
                    seen.set(line);
                }
                ctx.reject()
            });
            ctx.raise(Oops::Parse(42))
        });

        assert!(!result.unwrap());
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn handlers_intercept_failures_raised_by_other_handlers() {
        let result = decide(|ctx: &mut Decision<'_, Oops>| {
            ctx.on_err(OopsKind::Parse, |ctx, _| ctx.raise(Oops::Network("retry")));
            ctx.on_err(OopsKind::Network, |ctx, _| ctx.accept());
            ctx.raise(Oops::Parse(1))
        });
        assert!(result.unwrap());
    }

    #[test]
    fn handlers_registered_inside_handlers_stay_active() {
        let result = decide(|ctx: &mut Decision<'_, Oops>| {
            ctx.on_err(OopsKind::Parse, |ctx, _| {
                ctx.on_undefined(|ctx| ctx.accept());
                ctx.decide()
            });
            ctx.raise(Oops::Parse(1))
        });
        assert!(result.unwrap());
    }

    #[test]
    fn later_registration_wins() {
        let result = decide(|ctx: &mut Decision<'_, Oops>| {
            ctx.on_err(OopsKind::Network, |ctx, _| ctx.accept());
            ctx.on_err(OopsKind::Network, |ctx, _| ctx.reject());
            ctx.raise(Oops::Network("x"))
        });
        assert!(!result.unwrap());
    }

    #[test]
    fn self_reraising_handler_hits_the_ceiling() {
        let calls = Cell::new(0u32);
        let result = decide::<Oops, _>(|ctx| {
            ctx.on_err(OopsKind::Network, |ctx, failure| {
                calls.set(calls.get() + 1);
                ctx.raise(failure)
            });
            ctx.raise(Oops::Network("flaky"))
        });

        assert!(matches!(
            result,
            Err(DecisionError::TooManyReentries {
                limit: DEFAULT_MAX_ATTEMPTS
            })
        ));
        // The initial run takes the first attempt.
        assert_eq!(calls.get(), DEFAULT_MAX_ATTEMPTS - 1);
    }

    #[test]
    fn ceiling_is_tunable() {
        let evaluator = Evaluator::new(EvaluatorConfig { max_attempts: 3 }).unwrap();
        let calls = Cell::new(0u32);
        let result = evaluator.decide::<Infallible, _>(|ctx| {
            ctx.on_undefined(|ctx| {
                calls.set(calls.get() + 1);
                ctx.decide()
            });
            ctx.decide()
        });

        assert!(matches!(
            result,
            Err(DecisionError::TooManyReentries { limit: 3 })
        ));
        // attempt 1: routine, attempt 2: undefined raise, attempt 3: handler
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn ceiling_is_not_recoverable() {
        let evaluator = Evaluator::new(EvaluatorConfig { max_attempts: 2 }).unwrap();
        let result = evaluator.decide(|ctx: &mut Decision<'_, Oops>| {
            ctx.on_undefined(|ctx| ctx.accept());
            ctx.on_err(OopsKind::Parse, |ctx, failure| ctx.raise(failure));
            ctx.raise(Oops::Parse(0))
        });
        assert!(matches!(
            result,
            Err(DecisionError::TooManyReentries { limit: 2 })
        ));
    }

    #[test]
    fn failing_side_effect_preempts_accept() {
        let result = decide(|ctx: &mut Decision<'_, Oops>| {
            ctx.accept_then(|| Err(Oops::Network("audit log down")))
        });
        assert!(matches!(
            result.unwrap_err().into_raised(),
            Some(Oops::Network("audit log down"))
        ));
    }

    #[test]
    fn failing_side_effect_leaves_accept_staged_for_handlers() {
        let result = decide(|ctx: &mut Decision<'_, Oops>| {
            ctx.on_err(OopsKind::Network, |ctx, _| {
                assert_eq!(ctx.verdict(), Verdict::Accept);
                ctx.decide()
            });
            ctx.accept_then(|| Err(Oops::Network("flaky")))
        });
        assert!(result.unwrap());
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let err = Evaluator::new(EvaluatorConfig { max_attempts: 0 }).unwrap_err();
        assert_eq!(err, ConfigError::ZeroAttempts);
    }

    #[test]
    fn config_defaults_when_fields_missing() {
        let config: EvaluatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EvaluatorConfig::default());
        assert_eq!(config.max_attempts, 100);
    }
}
