use thiserror::Error;

/// Error taxonomy for `statelink-fsm` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error("state name is empty or exceeds {max} bytes", max = crate::MAX_NAME_LEN)]
    InvalidState,

    #[error("no transition named {0:?} is known, or it has been invalidated")]
    InvalidTransition(String),

    #[error("state machine already holds the maximum of {0} states")]
    MaxStatesReached(usize),

    #[error("state machine already holds the maximum of {0} transitions")]
    MaxTransitionsReached(usize),

    #[error("state {0} is locked")]
    StateLocked(u32),

    #[error("state {0} failed integrity verification")]
    IntegrityCheckFailed(u32),

    #[error("snapshot version {snapshot} does not match live version {live}")]
    VersionMismatch { live: u32, snapshot: u32 },

    #[error("state id {0} does not exist")]
    UnknownState(u32),
}
