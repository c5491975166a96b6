use thiserror::Error;

/// Reasons a session is refused before any diner is seated.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("a ring needs at least 2 diners, got {0}")]
    TooFewAgents(usize),

    #[error("{which} step range {low}..={high} is empty")]
    EmptyStepRange {
        which: &'static str,
        low: u32,
        high: u32,
    },

    #[error("{0} step unit must be non-zero")]
    ZeroUnit(&'static str),

    #[error("expected {expected} names, got {actual}")]
    NameCountMismatch { expected: usize, actual: usize },
}
