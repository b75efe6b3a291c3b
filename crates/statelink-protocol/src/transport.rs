use thiserror::Error;

/// Errors a [`Transport`] may report from `send`.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,
    #[error("transport write failed: {0}")]
    Io(String),
}

/// A blocking byte sink a [`crate::ProtocolContext`] writes framed
/// messages to. Reading/reassembly is the host's job — `process` is
/// called once a complete frame is already in hand (see crate docs).
pub trait Transport {
    fn send(&mut self, bytes: &[u8]) -> Result<usize, TransportError>;
}
