use thiserror::Error;

use statelink_codec::CodecError;
use statelink_fsm::FsmError;

/// Errors surfaced by [`crate::ProtocolContext`]'s operations.
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    #[error("decoding failed: {0}")]
    Decode(#[from] CodecError),

    #[error("framed message exceeds max_message_size ({size} > {max})")]
    Oversize { size: usize, max: usize },

    #[error("transport write failed: {0}")]
    SendFail(String),

    #[error("transport wrote {wrote} of {expected} bytes")]
    ShortWrite { wrote: usize, expected: usize },

    #[error("transition not permitted from the current lifecycle state")]
    TransitionFail(#[from] FsmError),

    #[error("operation is not valid in the current lifecycle state")]
    InvalidArgs,
}
