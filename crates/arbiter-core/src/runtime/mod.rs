//! Runtime - the decision context, its handler table and the evaluator driving them.

pub mod context;
pub mod evaluator;
pub mod handlers;

pub use self::context::Decision;
pub use self::evaluator::{
    DEFAULT_MAX_ATTEMPTS, Evaluator, EvaluatorConfig, decide, make_decision,
};
pub use self::handlers::HandlerTable;

// Failure type shared by the runtime tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::Failure;

    #[derive(Debug, PartialEq, Eq)]
    pub enum Oops {
        Network(&'static str),
        Parse(u32),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum OopsKind {
        Network,
        Parse,
    }

    impl Failure for Oops {
        type Kind = OopsKind;

        fn kind(&self) -> OopsKind {
            match self {
                Oops::Network(_) => OopsKind::Network,
                Oops::Parse(_) => OopsKind::Parse,
            }
        }
    }
}
