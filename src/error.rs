use thiserror::Error;

/// Input rejected before a simulation starts.
///
/// Contract violations inside a run (dispatching a finished process,
/// calling a run-only operation from outside `on_tick`, ...) are bugs and
/// panic instead of producing one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("process {name:?} has a burst time of zero, bursts must be positive")]
    ZeroBurst { name: String },

    #[error("expected {expected} {field} values, found {found}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("process {name:?} would push the simulated clock past u64::MAX ticks")]
    TimeOverflow { name: String },

    #[error("workload contains no processes")]
    EmptyWorkload,

    #[error("unknown scheduling algorithm {0:?}")]
    UnknownAlgorithm(String),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}
