use thiserror::Error;

/// Reasons `decode` can reject a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Buffer is shorter than the header, or shorter than
    /// `header + payload_length`.
    #[error("truncated frame: need at least {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    /// Header's `version` field doesn't match `PROTOCOL_VERSION`.
    #[error("protocol version mismatch: expected {expected}, got {got}")]
    VersionMismatch { expected: u8, got: u8 },

    /// Header's `kind` byte isn't one of the five known message types.
    #[error("invalid message type: {0}")]
    InvalidType(u8),

    /// Recomputed payload checksum didn't match the header's checksum.
    #[error("checksum mismatch: header says {expected:#010x}, computed {computed:#010x}")]
    ChecksumFail { expected: u32, computed: u32 },

    /// Encoded frame (or decoded claim) exceeds the configured maximum.
    #[error("frame of {size} bytes exceeds max_message_size of {max}")]
    Oversize { size: usize, max: usize },
}
