use std::sync::mpsc;
use std::sync::Arc;

use statelink_protocol::{Transport, TransportError};

/// A synchronous, in-memory [`Transport`] pair, for wiring two
/// `ProtocolContext`s together in tests and doctests without a real
/// socket.
///
/// Unlike an async channel transport, `send` never blocks past the
/// channel's own buffering — there's no `recv` half on this type.
/// Delivery to the peer is a separate step: drain `inbox()` and feed
/// each frame to the peer's `process`.
pub struct MemTransport {
    outbox: mpsc::Sender<Vec<u8>>,
    inbox: Arc<mpsc::Receiver<Vec<u8>>>,
}

impl MemTransport {
    /// Build two transports wired to each other: `a`'s sends land in
    /// `b`'s inbox and vice versa.
    pub fn pair() -> (Self, Self) {
        let (tx_a, rx_a) = mpsc::channel();
        let (tx_b, rx_b) = mpsc::channel();

        let a = MemTransport {
            outbox: tx_b,
            inbox: Arc::new(rx_a),
        };
        let b = MemTransport {
            outbox: tx_a,
            inbox: Arc::new(rx_b),
        };
        (a, b)
    }

    /// Drain every frame sent by the peer since the last drain.
    pub fn drain(&self) -> Vec<Vec<u8>> {
        self.inbox.try_iter().collect()
    }
}

impl Transport for MemTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        self.outbox
            .send(bytes.to_vec())
            .map(|()| bytes.len())
            .map_err(|_| TransportError::Closed)
    }
}
