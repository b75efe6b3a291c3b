//! Drives a connection's lifecycle on top of `statelink-fsm`, and
//! translates between wire frames (`statelink-codec`/`statelink-wire`)
//! and user-visible callbacks.
//!
//! The lifecycle is fixed: `INIT -> HANDSHAKE -> AUTH -> READY`, with
//! `ERROR` reachable from `READY` and `CLOSED` reachable from `ERROR`.
//! `can_transition` enforces that table; the FSM core underneath is
//! deliberately looser (see `statelink-fsm`'s crate docs) and the
//! protocol engine is what tightens it back up.

mod callbacks;
mod config;
mod context;
mod error;
mod state;
mod transport;

pub use callbacks::{NoopCallbacks, ProtocolCallbacks};
pub use config::ProtocolConfig;
pub use context::ProtocolContext;
pub use error::ProtocolError;
pub use state::{can_transition, LifecycleState};
pub use transport::{Transport, TransportError};

pub use statelink_wire::{MessageFlags, MessageType, PROTOCOL_MAGIC, PROTOCOL_VERSION};

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingCallbacks {
        handshakes: u32,
        state_changes: Vec<(LifecycleState, LifecycleState)>,
        errors: Vec<Vec<u8>>,
    }

    impl ProtocolCallbacks for RecordingCallbacks {
        fn on_handshake(&mut self) {
            self.handshakes += 1;
        }
        fn on_state_change(&mut self, old: LifecycleState, new: LifecycleState) {
            self.state_changes.push((old, new));
        }
        fn on_error(&mut self, message: &[u8]) {
            self.errors.push(message.to_vec());
        }
    }

    struct ChannelTransport {
        sink: Rc<RefCell<Vec<Vec<u8>>>>,
        short_write: bool,
    }

    impl Transport for ChannelTransport {
        fn send(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
            self.sink.borrow_mut().push(bytes.to_vec());
            if self.short_write {
                Ok(bytes.len() - 1)
            } else {
                Ok(bytes.len())
            }
        }
    }

    fn context() -> (ProtocolContext<RecordingCallbacks, ChannelTransport>, Rc<RefCell<Vec<Vec<u8>>>>) {
        let sink = Rc::new(RefCell::new(Vec::new()));
        let transport = ChannelTransport {
            sink: sink.clone(),
            short_write: false,
        };
        let ctx = ProtocolContext::init(RecordingCallbacks::default(), transport, ProtocolConfig::default()).unwrap();
        (ctx, sink)
    }

    #[test]
    fn s5_handshake_round_trip_via_update() {
        let (mut ctx, sink) = context();
        assert_eq!(ctx.get_state(), LifecycleState::Init);

        ctx.update().unwrap(); // INIT -> HANDSHAKE
        assert_eq!(ctx.get_state(), LifecycleState::Handshake);
        assert_eq!(sink.borrow().len(), 1);

        ctx.update().unwrap(); // HANDSHAKE -> AUTH
        assert_eq!(ctx.get_state(), LifecycleState::Auth);

        ctx.authenticate(b"token").unwrap();
        assert_eq!(sink.borrow().len(), 2);
        assert_eq!(ctx.get_state(), LifecycleState::Auth, "authenticate alone must not transition");

        ctx.update().unwrap(); // AUTH -> READY
        assert_eq!(ctx.get_state(), LifecycleState::Ready);
        assert!(ctx.is_authenticated());
        assert!(ctx.is_connected());

        assert_eq!(ctx.callbacks().state_changes.len(), 3);
    }

    #[test]
    fn start_handshake_outside_init_is_rejected() {
        let (mut ctx, _sink) = context();
        ctx.update().unwrap(); // now in HANDSHAKE
        assert!(matches!(ctx.start_handshake(), Err(ProtocolError::InvalidArgs)));
    }

    #[test]
    fn set_error_forces_error_from_any_state() {
        let (mut ctx, _sink) = context();
        ctx.set_error(b"boom").unwrap();
        assert_eq!(ctx.get_state(), LifecycleState::Error);
        assert!(ctx.is_error());
        assert_eq!(ctx.error_message(), b"boom");
        assert_eq!(ctx.callbacks().errors.last().unwrap(), b"boom");
    }

    #[test]
    fn error_buffer_truncates_to_256_bytes() {
        let (mut ctx, _sink) = context();
        let long = vec![b'x'; 1000];
        ctx.set_error(&long).unwrap();
        assert_eq!(ctx.error_message().len(), 256);
    }

    #[test]
    fn s6_checksum_corruption_drops_frame_silently() {
        let (mut ctx, _sink) = context();
        let framed = statelink_codec::encode(MessageType::Command, MessageFlags::empty(), 1, b"ping");
        let mut corrupted = framed.to_vec();
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0x01;

        let before = ctx.get_state();
        let result = ctx.process(&corrupted);
        assert!(result.is_err());
        assert_eq!(ctx.get_state(), before, "a bad frame must not force a state change");
        assert_eq!(ctx.callbacks().handshakes, 0);
    }

    #[test]
    fn process_dispatches_handshake_to_callback() {
        let (mut ctx, _sink) = context();
        let framed = statelink_codec::encode(MessageType::Handshake, MessageFlags::RELIABLE, 1, &[]);
        ctx.process(&framed).unwrap();
        assert_eq!(ctx.callbacks().handshakes, 1);
    }

    #[test]
    fn send_reports_short_write() {
        let sink = Rc::new(RefCell::new(Vec::new()));
        let transport = ChannelTransport {
            sink: sink.clone(),
            short_write: true,
        };
        let mut ctx = ProtocolContext::init(RecordingCallbacks::default(), transport, ProtocolConfig::default()).unwrap();
        let result = ctx.send(MessageType::Heartbeat, &[], MessageFlags::empty());
        assert!(matches!(result, Err(ProtocolError::ShortWrite { .. })));
    }

    #[test]
    fn send_rejects_oversize_frames() {
        let sink = Rc::new(RefCell::new(Vec::new()));
        let transport = ChannelTransport { sink, short_write: false };
        let config = ProtocolConfig::default().with_max_message_size(20);
        let mut ctx = ProtocolContext::init(RecordingCallbacks::default(), transport, config).unwrap();

        let result = ctx.send(MessageType::Command, &[0u8; 100], MessageFlags::empty());
        assert!(matches!(result, Err(ProtocolError::Oversize { .. })));
    }

    #[test]
    fn sequence_numbers_increase_across_sends() {
        let (mut ctx, _sink) = context();
        ctx.authenticate(b"a").unwrap();
        let first = ctx.last_sequence_for_test();
        ctx.authenticate(b"b").unwrap();
        assert_eq!(ctx.last_sequence_for_test(), first + 1);
    }

    #[test]
    fn sequence_numbers_wrap_at_u32_max() {
        let (mut ctx, _sink) = context();
        ctx.set_next_sequence_for_test(u32::MAX);
        ctx.authenticate(b"a").unwrap();
        assert_eq!(ctx.last_sequence_for_test(), u32::MAX);
        ctx.authenticate(b"b").unwrap();
        assert_eq!(ctx.last_sequence_for_test(), 0, "sequence numbers wrap modulo 2^32");
    }
}
